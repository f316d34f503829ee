use tabled::{Table, Tabled};
use tabled::settings::{Style, Color, Modify};
use tabled::settings::object::Rows;
use kpi_dashboard_core::{format_date, AreaBar, DashboardView, PeriodSummary, ProgressTier};

const BAR_WIDTH: usize = 20;

#[derive(Tabled)]
struct KpiRow {
    #[tabled(rename = "KPI")]
    kpi: String,
    #[tabled(rename = "Actual")]
    actual: i64,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

#[derive(Tabled)]
struct AreaRow {
    #[tabled(rename = "Area")]
    area: String,
    #[tabled(rename = "Count")]
    value: i64,
    #[tabled(rename = "")]
    bar: String,
}

pub fn print_dashboard(view: &DashboardView) {
    println!("\x1b[1;36mWeekly\x1b[0m {}", view.period_label);
    print_period(&view.weekly);

    println!("\n\x1b[1;36mMonthly\x1b[0m {}/{:02}", view.year, view.month);
    print_period(&view.monthly);

    println!("\n\x1b[1;36mYearly\x1b[0m {}", view.year);
    print_period(&view.yearly);

    println!("\n\x1b[1;36mAreas\x1b[0m (week of {})", format_date(view.week_start));
    print_areas(&view.areas);
}

fn print_period(summary: &PeriodSummary) {
    let rows: Vec<KpiRow> = summary
        .cards
        .iter()
        .map(|card| KpiRow {
            kpi: card.kpi.label().to_string(),
            actual: card.actual,
            target: if summary.target.is_some() { card.target.to_string() } else { "-".to_string() },
            rate: format!("{}%", card.rate),
            progress: format!("{} {}", bar(card.bar_percent as f64), tier_mark(card.tier)),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

fn print_areas(areas: &[AreaBar]) {
    if areas.is_empty() {
        println!("No area data for this week.");
        return;
    }
    let rows: Vec<AreaRow> = areas
        .iter()
        .map(|a| AreaRow {
            area: a.area.clone(),
            value: a.value,
            bar: bar(a.ratio),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn tier_mark(tier: ProgressTier) -> &'static str {
    match tier {
        ProgressTier::Achieved => "✔",
        ProgressTier::OnTrack => "▲",
        ProgressTier::Behind => " ",
    }
}
