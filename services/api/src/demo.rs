use crate::infra::{load_catalog, matching_service, resolve_dataset_dir, MatchingService};
use chrono::Local;
use clap::Args;
use profile_matching::error::AppError;
use profile_matching::matching::{
    CalculationRequest, CandidateId, MatchingError, PositionId, ProfileCatalog, ResultView,
    Scorecard,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// Position whose target profile candidates are measured against
    #[arg(long)]
    pub(crate) position_id: u64,
    /// Candidate to score; repeat for several. Omit to score every candidate with scores.
    #[arg(long = "candidate-id")]
    pub(crate) candidate_ids: Vec<u64>,
    /// Directory of CSV tables (defaults to APP_DATASET_DIR, then the bundled sample)
    #[arg(long)]
    pub(crate) dataset_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory of CSV tables (defaults to APP_DATASET_DIR, then the bundled sample)
    #[arg(long)]
    pub(crate) dataset_dir: Option<PathBuf>,
}

pub(crate) fn run_calculate(args: CalculateArgs) -> Result<(), AppError> {
    let CalculateArgs {
        position_id,
        candidate_ids,
        dataset_dir,
    } = args;

    let catalog = load_catalog(resolve_dataset_dir(dataset_dir)?)?;
    let service = matching_service(catalog);

    let request = CalculationRequest {
        position_id: PositionId(position_id),
        candidate_ids: candidate_ids.into_iter().map(CandidateId).collect(),
    };
    let stored = service.calculate(&request)?;
    if stored.is_empty() {
        println!("No candidates evaluated for position {position_id}");
        return Ok(());
    }

    let views = service.list_results(Some(request.position_id))?;
    render_ranking(&views);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = load_catalog(resolve_dataset_dir(args.dataset_dir)?)?;
    let service = matching_service(catalog);

    println!(
        "Profile matching demo ({})",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    render_catalog(&service)?;

    for position in service.catalog().positions() {
        println!("\nPosition {}: {}", position.id, position.name);

        let stored = match service.calculate(&CalculationRequest::for_all(position.id)) {
            Ok(stored) => stored,
            Err(MatchingError::MissingTargetProfile(_)) => {
                println!("  No target profile defined; skipped");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        if stored.is_empty() {
            println!("  No scored candidates");
            continue;
        }

        let views = service.list_results(Some(position.id))?;
        render_ranking(&views);

        if let Some(leader) = views.first() {
            let scorecard = service.explain(position.id, leader.result.candidate_id)?;
            let name = leader
                .candidate
                .as_ref()
                .map(|candidate| candidate.name.as_str())
                .unwrap_or("unknown candidate");
            println!("  Gap breakdown for {name}:");
            render_scorecard(&scorecard);
        }
    }

    Ok(())
}

fn render_catalog(service: &MatchingService) -> Result<(), AppError> {
    let catalog = service.catalog();

    println!("Aspects:");
    for aspect in catalog.aspects() {
        println!("  - {} ({:.0}%)", aspect.name, aspect.percentage);
    }

    let criteria = catalog.list_criteria().map_err(MatchingError::from)?;
    println!("Criteria:");
    for criterion in &criteria {
        println!(
            "  - {} {} [{}]",
            criterion.code,
            criterion.name,
            criterion.track().label()
        );
    }

    println!("Target profiles:");
    for position in catalog.positions() {
        let targets = catalog
            .list_target_profiles(position.id)
            .map_err(MatchingError::from)?;
        let summary: Vec<String> = targets
            .iter()
            .map(|target| {
                let code = criteria
                    .iter()
                    .find(|criterion| criterion.id == target.criterion_id)
                    .map(|criterion| criterion.code.as_str())
                    .unwrap_or("?");
                format!("{code}={}", target.target_value)
            })
            .collect();
        if summary.is_empty() {
            println!("  - {}: none", position.name);
        } else {
            println!("  - {}: {}", position.name, summary.join(", "));
        }
    }

    Ok(())
}

fn render_ranking(views: &[ResultView]) {
    println!("  Rank | Candidate                  | Core  | Second | Total");
    for view in views {
        let name = view
            .candidate
            .as_ref()
            .map(|candidate| candidate.name.clone())
            .unwrap_or_else(|| format!("candidate {}", view.result.candidate_id));
        println!(
            "  {:>4} | {:<26} | {:.3} | {:.3}  | {:.3}",
            view.rank.unwrap_or_default(),
            name,
            view.result.core_factor,
            view.result.secondary_factor,
            view.result.total_score
        );
    }
}

fn render_scorecard(scorecard: &Scorecard) {
    for component in &scorecard.components {
        println!(
            "    - {} [{}] target {} actual {} gap {:+} -> weight {}",
            component.code,
            component.track.label(),
            component.target,
            component.actual,
            component.gap,
            component.weight
        );
    }
    for skipped in &scorecard.skipped {
        println!(
            "    - criterion {} skipped ({:?})",
            skipped.criterion_id, skipped.reason
        );
    }
    println!(
        "    core {:.3} | secondary {:.3} | total {:.3}",
        scorecard.core_factor, scorecard.secondary_factor, scorecard.total_score
    );
}
