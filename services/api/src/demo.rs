use crate::infra::{InMemoryProgressRepository, InMemoryResultRepository};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use indivar::assessments::{
    score_responses, AssessmentService, InventoryKind, LikertValue, QuestionBank, ResponseSet,
    ScoreReport,
};
use indivar::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Inventory to score against (bfi2 or hexaco)
    #[arg(long, value_parser = parse_inventory)]
    pub(crate) inventory: InventoryKind,
    /// Path to a JSON file mapping item numbers to 1-5 responses
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Include the facet breakdown in the output
    #[arg(long)]
    pub(crate) facets: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Inventory to demo (defaults to bfi2)
    #[arg(long, value_parser = parse_inventory)]
    pub(crate) inventory: Option<InventoryKind>,
    /// Skip the submission and history portion of the demo
    #[arg(long)]
    pub(crate) skip_submission: bool,
}

pub(crate) fn parse_inventory(raw: &str) -> Result<InventoryKind, String> {
    InventoryKind::from_slug(raw.trim())
        .ok_or_else(|| format!("unknown inventory '{raw}' (expected bfi2 or hexaco)"))
}

fn load_bank(inventory: InventoryKind) -> Result<QuestionBank, AppError> {
    let bank = match inventory {
        InventoryKind::Bfi2 => QuestionBank::bfi2()?,
        InventoryKind::Hexaco => QuestionBank::hexaco()?,
    };
    Ok(bank)
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        inventory,
        responses,
        facets,
    } = args;

    let bank = load_bank(inventory)?;
    let raw = std::fs::read_to_string(&responses)?;
    let responses: ResponseSet = match serde_json::from_str(&raw) {
        Ok(responses) => responses,
        Err(err) => {
            println!("Responses file is not a valid item->value map: {err}");
            return Ok(());
        }
    };

    let report = match score_responses(&bank, &responses) {
        Ok(report) => report,
        Err(err) => {
            println!("Scoring rejected: {err}");
            return Ok(());
        }
    };

    render_report(&bank, &report, facets);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        inventory,
        skip_submission,
    } = args;
    let inventory = inventory.unwrap_or(InventoryKind::Bfi2);

    println!(
        "IndiVar assessment demo ({}) - {}",
        inventory.title(),
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    );

    let bank = load_bank(inventory)?;
    let responses = synthetic_responses(&bank);
    println!(
        "Synthesized {} responses across {} domains",
        responses.len(),
        bank.taxonomy().domains().len()
    );

    let report = match score_responses(&bank, &responses) {
        Ok(report) => report,
        Err(err) => {
            println!("Scoring rejected: {err}");
            return Ok(());
        }
    };
    render_report(&bank, &report, true);

    if skip_submission {
        return Ok(());
    }

    println!("\nSubmission and history demo");
    let results = Arc::new(InMemoryResultRepository::default());
    let progress = Arc::new(InMemoryProgressRepository::default());
    let service = AssessmentService::new(results, progress, vec![bank]);

    let stored = match service.submit(inventory.slug(), responses) {
        Ok(stored) => stored,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Stored result {} for {} at {}",
        stored.result_id.0,
        stored.test_type.slug(),
        stored.completed_at.to_rfc3339()
    );

    match serde_json::to_string_pretty(&stored.summary_view()) {
        Ok(json) => println!("  Summary payload:\n{json}"),
        Err(err) => println!("  Summary payload unavailable: {err}"),
    }

    match service.stats() {
        Ok(stats) => {
            println!("  Completion stats:");
            for entry in stats {
                println!(
                    "    - {}: {} result(s), last taken {}",
                    entry.test_type.slug(),
                    entry.count,
                    entry.last_taken.to_rfc3339()
                );
            }
        }
        Err(err) => println!("  Stats unavailable: {err}"),
    }

    match service.export_csv(None) {
        Ok(csv) => {
            println!("  CSV export preview:");
            for line in csv.lines().take(3) {
                println!("    {line}");
            }
        }
        Err(err) => println!("  CSV export unavailable: {err}"),
    }

    Ok(())
}

/// Deterministic fill cycling the scale so repeated demo runs print the same
/// numbers.
fn synthetic_responses(bank: &QuestionBank) -> ResponseSet {
    let mut responses = ResponseSet::new();
    for item in bank.questions() {
        let value = (item.item_number % 5) as u8 + 1;
        if let Ok(value) = LikertValue::new(value) {
            responses.record(item.item_number, value);
        }
    }
    responses
}

fn render_report(bank: &QuestionBank, report: &ScoreReport, include_facets: bool) {
    println!("\n{} domain scores", bank.inventory().title());
    for domain in &report.domains {
        println!(
            "- {}: {:.2}/5.00 ({}th percentile, {})",
            domain.domain, domain.raw_score, domain.percentile, domain.level
        );
        println!("  {}", domain.description);
        if include_facets {
            for facet in &domain.facets {
                println!(
                    "    {}: {:.2}/5.00 ({}th percentile)",
                    facet.facet, facet.raw_score, facet.percentile
                );
            }
        }
    }

    let vector = report.chart_vector();
    let rendered: Vec<String> = vector.iter().map(|value| format!("{value:.2}")).collect();
    println!("Radar vector: [{}]", rendered.join(", "));
}
