use crate::infra::parse_date;
use barangay_registry::error::AppError;
use barangay_registry::residents::{
    age_on, parse_birthdate, AccessPolicy, ApprovalOutcome, Caller, Choice,
    InMemoryResidentRepository, ResidentFilter, ResidentQuery, ResidentRegistryService,
    ResidentRow, ResidentSubmission, UserId,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AgeArgs {
    /// Birthdate in any accepted form (YYYY-MM-DD preferred)
    #[arg(long)]
    pub(crate) birthdate: String,
    /// Reference date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date used for age derivation (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_age(args: AgeArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    match parse_birthdate(&args.birthdate) {
        Some(birthdate) => println!(
            "{} -> age {} as of {}",
            birthdate,
            age_on(birthdate, today),
            today
        ),
        None => println!(
            "'{}' is not a recognizable date; age would be left unset",
            args.birthdate.trim()
        ),
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let repository = Arc::new(InMemoryResidentRepository::default());
    let service = ResidentRegistryService::new(repository, AccessPolicy::default());

    let purok_one = Caller::new(UserId(10), ["encoder"]);
    let purok_two = Caller::new(UserId(11), ["encoder"]);
    let secretary = Caller::new(UserId(1), ["brgySecretary"]);

    println!("Barangay resident registry demo (reference date {today})");

    println!("\nIntake");
    for (caller, submission) in demo_submissions() {
        match service.create(&caller, submission, today) {
            Ok(saved) => {
                println!(
                    "- encoder {} saved #{} {}",
                    caller.user_id,
                    saved.resident.id,
                    saved.resident.full_name()
                );
                for warning in &saved.warnings {
                    println!("  warning: {warning}");
                }
            }
            Err(err) => println!("- encoder {} rejected: {}", caller.user_id, err),
        }
    }

    println!("\nScoped listings");
    for caller in [&purok_one, &purok_two, &secretary] {
        let rows = service.list(caller, &ResidentQuery::new())?;
        println!("- user {} sees {} record(s)", caller.user_id, rows.len());
        render_rows(&rows);
    }

    println!("\nApproval");
    let pending = service.list(
        &secretary,
        &ResidentQuery::new().with_filter(ResidentFilter::PendingApproval),
    )?;
    if let Some(first) = pending.first() {
        let id = first.resident.id;
        let attempt = service.approve(&purok_one, id)?;
        println!("- encoder approving #{id}: {}", describe(&attempt));
        let attempt = service.approve(&secretary, id)?;
        println!("- secretary approving #{id}: {}", describe(&attempt));
        let attempt = service.approve(&secretary, id)?;
        println!("- secretary approving #{id} again: {}", describe(&attempt));
    }

    println!("\nFilters (secretary view)");
    for filter in ResidentFilter::ALL {
        let rows = service.list(&secretary, &ResidentQuery::new().with_filter(filter))?;
        println!("- {}: {}", filter.label(), rows.len());
    }
    let senior_women = service.list(
        &secretary,
        &ResidentQuery::new()
            .with_filter(ResidentFilter::SeniorCitizens)
            .with_filter(ResidentFilter::Female),
    )?;
    println!("- Age 60 and Above + Female: {}", senior_women.len());

    Ok(())
}

fn describe(outcome: &ApprovalOutcome) -> &'static str {
    match outcome {
        ApprovalOutcome::Approved(_) => "approved",
        ApprovalOutcome::Unavailable => "action unavailable",
    }
}

fn render_rows(rows: &[ResidentRow]) {
    for row in rows {
        let details = &row.resident.details;
        let age = details
            .age
            .map(|age| age.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    #{} {} | age {} | {} | {} | approved: {} | approve offered: {}",
            row.resident.id,
            row.full_name,
            age,
            details.purok,
            details.sex.label(),
            if row.resident.is_approved { "yes" } else { "no" },
            if row.actions.approve { "yes" } else { "no" },
        );
    }
}

fn demo_submissions() -> Vec<(Caller, ResidentSubmission)> {
    let base = ResidentSubmission {
        lastname: Some("dela CRUZ".to_string()),
        firstname: Some("JUAN".to_string()),
        middlename: Some("santos".to_string()),
        birthdate: Some("1988-04-12".to_string()),
        purok: Some("purok 1".to_string()),
        placeofbirth: Some("TAGBILARAN city".to_string()),
        sex: Some("Male".to_string()),
        civilstatus: Some("Married".to_string()),
        position_in_family: Some("Head of the family".to_string()),
        citizenship: Some("Filipino".to_string()),
        other_citizenship: None,
        educ_attainment: Some("Graduate".to_string()),
        other_educational_att: None,
        occupation: Some("fisherman".to_string()),
        ofw: Some("No".to_string()),
        pwd: Some("No".to_string()),
    };

    let encoder_one = Caller::new(UserId(10), ["encoder"]);
    let encoder_two = Caller::new(UserId(11), ["encoder"]);

    vec![
        (encoder_one.clone(), base.clone()),
        (
            encoder_one.clone(),
            ResidentSubmission {
                firstname: Some("rosario".to_string()),
                birthdate: Some("1952-09-30".to_string()),
                sex: Some("Female".to_string()),
                civilstatus: Some("Widowed".to_string()),
                position_in_family: Some("Head of the family".to_string()),
                pwd: Some("Yes".to_string()),
                ..base.clone()
            },
        ),
        (
            encoder_two.clone(),
            ResidentSubmission {
                lastname: Some("BAUTISTA".to_string()),
                firstname: Some("liza".to_string()),
                middlename: None,
                birthdate: Some("sometime in 1995".to_string()),
                purok: Some("PUROK 2".to_string()),
                sex: Some("Female".to_string()),
                civilstatus: Some("Single".to_string()),
                position_in_family: Some("Daughter".to_string()),
                ofw: Some("Yes".to_string()),
                occupation: Some("nurse".to_string()),
                ..base.clone()
            },
        ),
        (
            encoder_two,
            ResidentSubmission {
                lastname: Some("Tan".to_string()),
                citizenship: Some("Others".to_string()),
                other_citizenship: None,
                ..base
            },
        ),
    ]
}
