use std::io::{self, Write};

use chrono::NaiveDate;
use grantdesk::error::AppError;
use grantdesk::grants::{
    filter_grants, write_template, GrantDraft, GrantFilter, GrantService, GrantStore,
    ImportOutcome,
};
use tracing::debug;

use crate::cli::{DeleteArgs, EditArgs, GrantArgs, ImportArgs, ListArgs, TemplateArgs};

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

impl GrantArgs {
    fn into_draft(self) -> GrantDraft {
        GrantDraft {
            name: self.name,
            entity: self.entity,
            order: self.order,
            grant_type: self.grant_type,
            sector: self.sector,
            components: self.components,
            amount: self.amount,
            currency: self.currency,
            meets_requirements: self.meets_requirements,
            missing_requirements: self.missing_requirements,
            deadline: self.deadline,
            link: self.link,
            call_status: self.call_status,
            usm_status: self.usm_status,
        }
    }
}

pub(crate) fn run_list<S: GrantStore>(
    service: &GrantService<S>,
    args: ListArgs,
) -> Result<(), AppError> {
    let filter = GrantFilter {
        search_term: args.search,
        order: args.order,
        grant_type: args.grant_type,
        call_status: args.call_status,
        usm_status: args.usm_status,
        min_amount: args.min_amount,
        max_amount: args.max_amount,
        start_date: args.from,
        end_date: args.to,
    };

    let grants = service.list()?;
    let matches = filter_grants(&grants, &filter);
    debug!(total = grants.len(), matched = matches.len(), "listing grants");

    if matches.is_empty() {
        println!("No grants matched ({} in store).", grants.len());
        return Ok(());
    }

    println!(
        "{:<12} {:<30} {:<22} {:>16} {:<12} {:<18} id",
        "deadline", "name", "entity", "amount", "call", "usm"
    );
    for grant in &matches {
        println!(
            "{:<12} {:<30} {:<22} {:>12} {:<3} {:<12} {:<18} {}",
            grant.deadline,
            clip(&grant.name, 30),
            clip(&grant.entity, 22),
            grant.amount,
            grant.currency,
            grant.call_status,
            grant.usm_status,
            grant.id
        );
    }
    println!("\n{} of {} grants shown.", matches.len(), grants.len());
    Ok(())
}

pub(crate) fn run_add<S: GrantStore>(
    service: &GrantService<S>,
    args: GrantArgs,
) -> Result<(), AppError> {
    let grant = service.create(args.into_draft())?;
    println!("Added \"{}\" ({}).", grant.name, grant.id);
    Ok(())
}

pub(crate) fn run_edit<S: GrantStore>(
    service: &GrantService<S>,
    args: EditArgs,
) -> Result<(), AppError> {
    let grant = service.update(&args.id, args.fields.into_draft())?;
    println!("Updated \"{}\" ({}).", grant.name, grant.id);
    Ok(())
}

pub(crate) fn run_delete<S: GrantStore>(
    service: &GrantService<S>,
    args: DeleteArgs,
) -> Result<(), AppError> {
    let grants = service.list()?;
    let Some(target) = grants.iter().find(|grant| grant.id == args.id) else {
        println!("No grant found with id {}; nothing deleted.", args.id);
        return Ok(());
    };

    if !args.yes && !confirm(&format!("Delete \"{}\"?", target.name))? {
        println!("Cancelled.");
        return Ok(());
    }

    service.delete(&args.id)?;
    println!("Deleted \"{}\".", target.name);
    Ok(())
}

pub(crate) fn run_import<S: GrantStore>(
    service: &GrantService<S>,
    args: ImportArgs,
) -> Result<(), AppError> {
    match service.import_from_path(&args.file)? {
        ImportOutcome::Imported { count } => {
            println!(
                "Imported {count} grants from \"{}\".",
                args.file.display()
            );
        }
        ImportOutcome::Rejected { errors, valid_rows } => {
            println!(
                "Import aborted: {} of {} data rows failed validation; nothing was imported.",
                errors.len(),
                errors.len() + valid_rows
            );
            for error in &errors {
                println!("  {error}");
            }
        }
        ImportOutcome::Empty => {
            println!(
                "No data rows found in \"{}\"; nothing was imported.",
                args.file.display()
            );
        }
    }
    Ok(())
}

pub(crate) fn run_template(args: TemplateArgs) -> Result<(), AppError> {
    write_template(&args.out)?;
    println!("Template written to \"{}\".", args.out.display());
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, AppError> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates_and_rejects_everything_else() {
        assert_eq!(
            parse_date(" 2025-12-31 ").expect("parse"),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
        assert!(parse_date("31/12/2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn clip_shortens_long_values_with_an_ellipsis() {
        assert_eq!(clip("short", 10), "short");
        let clipped = clip("a very long grant name indeed", 10);
        assert_eq!(clipped.chars().count(), 10);
        assert!(clipped.ends_with('…'));
    }
}
