use std::process::ExitCode;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::{json, Value};

use deed_gate::{RegistrationProposal, UpdateProposal};
use deed_registry::{
    snapshot, CallContext, InMemoryRegistry, RegistryConfig, RegistryError, RegistryReader,
    RegistryWriter,
};
use deed_types::code::Labelled;
use deed_types::{DocumentHash, Principal, Property, PropertyId, PropertyUpdate, RejectCode};

use crate::cli::*;

/// What a command produced, in both output forms.
pub struct Output {
    pub text: String,
    pub json: Value,
}

impl Output {
    fn new(text: impl Into<String>, json: Value) -> Self {
        Self {
            text: text.into(),
            json,
        }
    }
}

/// Run a parsed command line. Rejections are reported and turn into a
/// failing exit code; any other error propagates.
pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let format = cli.format;
    match execute(&cli) {
        Ok(output) => {
            match format {
                OutputFormat::Text => println!("{}", output.text),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output.json)?),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => match rejection(&err) {
            Some(code) => {
                match format {
                    OutputFormat::Text => {
                        eprintln!("{} rejected: {}", "✗".red().bold(), Labelled(code))
                    }
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "status": "rejected",
                            "code": code.code(),
                            "name": code.name(),
                        }))?
                    ),
                }
                Ok(ExitCode::FAILURE)
            }
            None => Err(err),
        },
    }
}

fn rejection(err: &anyhow::Error) -> Option<RejectCode> {
    err.downcast_ref::<RegistryError>()
        .and_then(RegistryError::reject_code)
}

/// Execute a command against the snapshot named on the command line.
pub fn execute(cli: &Cli) -> anyhow::Result<Output> {
    let config = match &cli.config {
        Some(path) => RegistryConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RegistryConfig::default(),
    };

    let Command::Init(args) = &cli.command else {
        let ctx = CallContext::new(
            cli.caller
                .parse::<Principal>()
                .context("invalid --caller principal")?,
        );
        let registry = open(cli, config)?;
        return dispatch(cli, &registry, &ctx);
    };
    cmd_init(cli, config, args)
}

fn dispatch(cli: &Cli, registry: &InMemoryRegistry, ctx: &CallContext) -> anyhow::Result<Output> {
    match &cli.command {
        Command::Init(_) => bail!("init cannot run against an open registry"),
        Command::SetAuthority(args) => cmd_set_authority(cli, registry, ctx, args),
        Command::SetFee(args) => cmd_set_fee(cli, registry, ctx, args),
        Command::Register(args) => cmd_register(cli, registry, ctx, args),
        Command::Update(args) => cmd_update(cli, registry, ctx, args),
        Command::Show(args) => cmd_show(registry, args.id),
        Command::Count => cmd_count(registry),
        Command::Exists(args) => cmd_exists(registry, args),
        Command::Transfers => cmd_transfers(registry),
        Command::Advance(args) => cmd_advance(cli, registry, args),
        Command::Status => cmd_status(cli, registry),
    }
}

/// An existing snapshot carries its own limits and fee policy; `config` only
/// seeds a registry that has no snapshot yet.
fn open(cli: &Cli, config: RegistryConfig) -> anyhow::Result<InMemoryRegistry> {
    let state = snapshot::load_if_exists(&cli.state)
        .with_context(|| format!("failed to load {}", cli.state.display()))?;
    Ok(match state {
        Some(state) => InMemoryRegistry::from_state(state)?,
        None => InMemoryRegistry::new(config),
    })
}

fn save(cli: &Cli, registry: &InMemoryRegistry) -> anyhow::Result<()> {
    snapshot::save(&cli.state, &registry.snapshot()?)
        .with_context(|| format!("failed to write {}", cli.state.display()))
}

fn cmd_init(cli: &Cli, config: RegistryConfig, args: &InitArgs) -> anyhow::Result<Output> {
    if cli.state.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            cli.state.display()
        );
    }
    let registry = InMemoryRegistry::new(config);
    save(cli, &registry)?;

    let path = cli.state.display().to_string();
    Ok(Output::new(
        format!(
            "{} Initialized registry in {}\n  Fee: {}\n  Capacity: {}",
            "✓".green().bold(),
            path.bold(),
            registry.registration_fee()?,
            registry.max_properties()?,
        ),
        json!({ "status": "ok", "state": path }),
    ))
}

fn cmd_set_authority(
    cli: &Cli,
    registry: &InMemoryRegistry,
    ctx: &CallContext,
    args: &SetAuthorityArgs,
) -> anyhow::Result<Output> {
    let authority = args
        .principal
        .parse::<Principal>()
        .context("invalid principal")?;
    registry.set_authority(ctx, authority.clone())?;
    save(cli, registry)?;

    Ok(Output::new(
        format!(
            "{} Authority set to {}",
            "✓".green().bold(),
            authority.as_str().cyan()
        ),
        json!({ "status": "ok", "authority": authority.as_str() }),
    ))
}

fn cmd_set_fee(
    cli: &Cli,
    registry: &InMemoryRegistry,
    ctx: &CallContext,
    args: &SetFeeArgs,
) -> anyhow::Result<Output> {
    registry.set_registration_fee(ctx, args.amount)?;
    save(cli, registry)?;

    Ok(Output::new(
        format!(
            "{} Registration fee set to {}",
            "✓".green().bold(),
            args.amount.to_string().bold()
        ),
        json!({ "status": "ok", "fee": args.amount }),
    ))
}

/// Hex text to raw bytes. Length is left to the registry, which rejects
/// anything but 32 bytes with its own code.
fn decode_hash(text: &str) -> anyhow::Result<Vec<u8>> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).with_context(|| format!("hash {text:?} is not valid hex"))
}

fn cmd_register(
    cli: &Cli,
    registry: &InMemoryRegistry,
    ctx: &CallContext,
    args: &RegisterArgs,
) -> anyhow::Result<Output> {
    let proposal = RegistrationProposal {
        legal_description: args.description.clone(),
        document_hash: decode_hash(&args.hash)?,
        address: args.address.clone(),
        location: args.location.clone(),
        currency: args.currency.clone(),
        size_sqft: args.size,
        zoning_type: args.zoning.clone(),
        tax_id: args.tax_id.clone(),
        assessment_value: args.assessment,
        lien_amount: args.lien,
        mortgage_amount: args.mortgage,
    };
    let id = registry.register_property(ctx, &proposal)?;
    save(cli, registry)?;

    let fee = registry.registration_fee()?;
    let authority = registry
        .authority()?
        .map(|a| a.as_str().to_string())
        .unwrap_or_default();
    Ok(Output::new(
        format!(
            "{} Registered property {}\n  Owner: {}\n  Fee: {} -> {}",
            "✓".green().bold(),
            id.to_string().yellow().bold(),
            ctx.caller.as_str().cyan(),
            fee,
            authority.cyan(),
        ),
        json!({
            "status": "ok",
            "id": id,
            "owner": ctx.caller.as_str(),
            "fee": fee,
            "authority": authority,
        }),
    ))
}

fn cmd_update(
    cli: &Cli,
    registry: &InMemoryRegistry,
    ctx: &CallContext,
    args: &UpdateArgs,
) -> anyhow::Result<Output> {
    let proposal = UpdateProposal {
        id: args.id,
        legal_description: args.description.clone(),
        address: args.address.clone(),
        size_sqft: args.size,
        zoning_type: args.zoning.clone(),
    };
    registry.update_property(ctx, &proposal)?;
    save(cli, registry)?;

    Ok(Output::new(
        format!(
            "{} Updated property {}",
            "✓".green().bold(),
            args.id.to_string().yellow().bold()
        ),
        json!({ "status": "ok", "id": args.id }),
    ))
}

fn property_json(id: PropertyId, property: &Property, update: Option<&PropertyUpdate>) -> Value {
    json!({
        "id": id,
        "owner": property.owner.as_str(),
        "legal_description": property.legal_description,
        "document_hash": property.document_hash.to_hex(),
        "address": property.address,
        "registered_at": property.registered_at.value(),
        "location": property.location,
        "currency": property.currency.as_str(),
        "status": property.status,
        "size_sqft": property.size_sqft,
        "zoning_type": property.zoning_type.as_str(),
        "tax_id": property.tax_id,
        "assessment_value": property.assessment_value,
        "has_lien": property.has_lien(),
        "lien_amount": property.lien_amount,
        "has_mortgage": property.has_mortgage(),
        "mortgage_amount": property.mortgage_amount,
        "last_update": update.map(|u| json!({
            "description": u.update_description,
            "address": u.update_address,
            "at": u.update_timestamp.value(),
            "updater": u.updater.as_str(),
            "size_sqft": u.update_size_sqft,
            "zoning_type": u.update_zoning_type.as_str(),
        })),
    })
}

fn cmd_show(registry: &InMemoryRegistry, id: PropertyId) -> anyhow::Result<Output> {
    let Some(property) = registry.get_property(id)? else {
        return Ok(Output::new(
            format!("No property with id {id}"),
            json!({ "id": id, "property": null }),
        ));
    };
    let update = registry.get_property_update(id)?;

    let mut text = format!(
        "Property {}  {}\n  Owner:       {}\n  Description: {}\n  Address:     {}\n  Location:    {}\n  Size:        {} sqft, {}\n  Assessment:  {} {}\n  Tax id:      {}\n  Lien:        {}\n  Mortgage:    {}\n  Registered:  {}",
        id.to_string().yellow().bold(),
        property.document_hash.short_hex().dimmed(),
        property.owner.as_str().cyan(),
        property.legal_description,
        property.address,
        property.location,
        property.size_sqft,
        property.zoning_type,
        property.assessment_value,
        property.currency,
        property.tax_id,
        property.lien_amount,
        property.mortgage_amount,
        property.registered_at,
    );
    if let Some(u) = &update {
        text.push_str(&format!(
            "\n  Last update: {} by {}",
            u.update_timestamp,
            u.updater.as_str().cyan()
        ));
    }

    let json = json!({ "id": id, "property": property_json(id, &property, update.as_ref()) });
    Ok(Output::new(text, json))
}

fn cmd_count(registry: &InMemoryRegistry) -> anyhow::Result<Output> {
    let count = registry.get_property_count()?;
    Ok(Output::new(count.to_string(), json!({ "count": count })))
}

fn cmd_exists(registry: &InMemoryRegistry, args: &ExistsArgs) -> anyhow::Result<Output> {
    let hash = DocumentHash::from_hex(&args.hash)
        .with_context(|| format!("hash {:?} is not a 32-byte hex digest", args.hash))?;
    let id = registry.property_id_by_hash(&hash)?;
    let text = match id {
        Some(id) => format!("{} registered as property {}", "yes".green(), id),
        None => "no".red().to_string(),
    };
    Ok(Output::new(
        text,
        json!({ "hash": hash.to_hex(), "exists": id.is_some(), "id": id }),
    ))
}

fn cmd_transfers(registry: &InMemoryRegistry) -> anyhow::Result<Output> {
    let transfers = registry.transfers()?;
    let text = if transfers.is_empty() {
        "No fee transfers.".to_string()
    } else {
        transfers
            .iter()
            .enumerate()
            .map(|(i, t)| {
                format!(
                    "{:>4}  {} {} -> {}",
                    i,
                    t.amount.to_string().bold(),
                    t.from.as_str(),
                    t.to.as_str().cyan()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    let json = Value::Array(
        transfers
            .iter()
            .map(|t| json!({ "amount": t.amount, "from": t.from.as_str(), "to": t.to.as_str() }))
            .collect(),
    );
    Ok(Output::new(text, json))
}

fn cmd_advance(
    cli: &Cli,
    registry: &InMemoryRegistry,
    args: &AdvanceArgs,
) -> anyhow::Result<Output> {
    let height = registry.advance_block(args.blocks)?;
    save(cli, registry)?;
    Ok(Output::new(
        format!("Block height {}", height.to_string().bold()),
        json!({ "block_height": height.value() }),
    ))
}

fn cmd_status(cli: &Cli, registry: &InMemoryRegistry) -> anyhow::Result<Output> {
    let authority = registry.authority()?;
    let fee = registry.registration_fee()?;
    let count = registry.get_property_count()?;
    let max = registry.max_properties()?;
    let height = registry.block_height()?;

    let authority_text = match &authority {
        Some(a) => a.as_str().cyan().to_string(),
        None => "(not set)".dimmed().to_string(),
    };
    Ok(Output::new(
        format!(
            "State: {}\n  Authority:  {}\n  Fee:        {}\n  Properties: {} / {}\n  Height:     {}",
            cli.state.display().to_string().bold(),
            authority_text,
            fee,
            count,
            max,
            height,
        ),
        json!({
            "authority": authority.as_ref().map(Principal::as_str),
            "fee": fee,
            "count": count,
            "max_properties": max,
            "block_height": height.value(),
        }),
    ))
}
