use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;

use canteen_accounts::{AccountService, UpdateParams};
use canteen_roles::{RoleIdentifier, RoleRegistry};
use canteen_store::{AccountQuery, GrantStore, InMemoryStore};
use canteen_types::{ChatHandle, WalletAmount};

use crate::cli::{CheckArgs, Cli, Command, DemoArgs, ResolveArgs};
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    match cli.command {
        Command::Roles => cmd_roles(),
        Command::Resolve(args) => cmd_resolve(args),
        Command::Check(args) => cmd_check(args),
        Command::Demo(args) => cmd_demo(args, &config),
    }
}

fn cmd_roles() -> anyhow::Result<()> {
    let registry = RoleRegistry::builtin();
    println!("{}", "Privilege ladder (ascending):".bold());
    for tier in registry.tiers() {
        println!("  {:>6}  {}", tier.rank.to_string().yellow(), tier.name);
    }
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let registry = RoleRegistry::builtin();
    let identifier = RoleIdentifier::parse(&args.identifier);
    let rank = registry.resolve(&identifier);
    if rank.is_some_role() {
        println!(
            "{} resolves to rank {} ({})",
            args.identifier.bold(),
            rank.to_string().yellow(),
            registry.name_of(rank).cyan()
        );
    } else {
        println!("{} resolves to no role", args.identifier.bold());
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let registry = RoleRegistry::builtin();
    let actor = registry.resolve(&RoleIdentifier::parse(&args.actor));
    let required = RoleIdentifier::parse(&args.required);
    if registry.satisfies(actor, &required) {
        println!(
            "{} rank {} ({}) satisfies '{}'",
            "✓".green().bold(),
            actor.to_string().yellow(),
            registry.name_of(actor),
            args.required
        );
    } else {
        println!(
            "{} rank {} ({}) does not satisfy '{}'",
            "✗".red().bold(),
            actor.to_string().yellow(),
            registry.name_of(actor),
            args.required
        );
    }
    Ok(())
}

fn cmd_demo(args: DemoArgs, config: &CliConfig) -> anyhow::Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let service = AccountService::new(
        store.clone(),
        store.clone(),
        RoleRegistry::builtin(),
        config.ledger_config(),
        config.service_config(),
    );
    let now = Utc::now();

    // First registration wins the founder promotion.
    let founder = service.register(ChatHandle::new("U0")?, "Founder", now)?;
    println!(
        "{} Registered {} as {} (rank {})",
        "✓".green().bold(),
        founder.display_name.bold(),
        service.registry().name_of(founder.role).cyan(),
        founder.role.to_string().yellow()
    );

    let mut members = Vec::new();
    for i in 1..=args.members {
        let member = service.register(
            ChatHandle::new(format!("U{i}"))?,
            format!("Member {i}"),
            now,
        )?;
        members.push(member);
    }
    println!(
        "{} Registered {} member account(s) at rank 1",
        "✓".green(),
        args.members
    );

    // Admin commands gate on Manager in the reference deployment.
    let required: RoleIdentifier = "Manager".into();
    if !service.authorize(&founder, &required) {
        anyhow::bail!("founder unexpectedly failed the Manager check");
    }
    if let Some(member) = members.first() {
        if !service.authorize(member, &required) {
            println!(
                "{} {} denied: rank {} does not satisfy 'Manager'",
                "✗".red(),
                member.display_name,
                member.role.to_string().yellow()
            );
        }
    }

    // The founder tops up each member and sets a lunch target.
    for (i, member) in members.iter().enumerate() {
        let params = UpdateParams {
            wallet: Some(WalletAmount::new(150.0 * (i as f64 + 1.0))?),
            role: None,
            lunch_target: Some(args.lunches),
        };
        service.apply_update(&member.handle, &founder, &params, now)?;
    }

    println!("\n{}", "Accounts (wallet descending):".bold());
    for account in service.list(&AccountQuery::default())? {
        let summary = service.balance_summary(&account.handle, now)?;
        println!(
            "  {:<10} {:<10} {:>12}  {} free lunch(es)",
            account.handle.to_string().dimmed(),
            account.display_name,
            summary.wallet_with_currency.bold(),
            summary.active_lunches.to_string().yellow()
        );
    }

    // Redeem one grant to show the one-way lifecycle.
    if let Some(member) = members.first() {
        let grants = store.active_for(&member.id, now)?;
        if let Some(grant) = grants.first() {
            service.ledger().redeem(&grant.id, now)?;
            let left = service.ledger().active_count(&member.id, now)?;
            println!(
                "\n{} {} redeemed a lunch ({} left, expires {})",
                "✓".green().bold(),
                member.display_name.bold(),
                left.to_string().yellow(),
                grant.expires_at.format("%Y-%m-%d")
            );
        }
    }

    // Founder role stays pinned even when someone tries to demote them.
    if let Some(member) = members.first() {
        let report = service.apply_update(
            &founder.handle,
            member,
            &UpdateParams::role("User"),
            now,
        )?;
        println!(
            "{} Demotion attempt on the founder: {:?}",
            "✗".red(),
            report.role_outcome
        );
    }

    Ok(())
}
