use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::info;

use marea_config::Settings;
use marea_core::{NewConsumption, PaymentMethod};
use marea_ledger::{CatalogStore, LedgerStore};
use marea_report::{ClientStatement, DailyReport};

use crate::render;
use crate::telemetry;

#[derive(Parser)]
#[command(name = "marea", version, about = "Registro de consumos - Marea Club")]
pub struct Cli {
    /// Explicit configuration file (defaults to ./marea.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the menu with unit price and margin
    Menu,
    /// Record a consumption for a client
    Record {
        client: String,
        product: String,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    /// Assign a payment method to all of a client's rows
    Pay {
        client: String,
        /// One of: Efectivo, Tarjeta, Transferencia, Mixto
        method: String,
    },
    /// List known clients
    Clients {
        /// Only clients that still have unpaid rows
        #[arg(long)]
        unpaid: bool,
    },
    /// Print the daily report
    Report {
        /// Target date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Also export the report as HTML into the backup directory
        #[arg(long)]
        html: bool,
    },
    /// Print a client's consumption statement
    Invoice { client: String },
    /// Close the day: archive the full ledger and reset it to empty
    Close {
        /// Proceed even when unpaid rows would be archived and dropped
        #[arg(long)]
        yes: bool,
    },
}

pub fn run() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    fs::create_dir_all(settings.backup_path()).with_context(|| {
        format!(
            "failed to create backup directory {}",
            settings.backup_path().display()
        )
    })?;
    let store = LedgerStore::new(settings.ledger_path());

    match cli.command {
        Command::Menu => menu(&settings),
        Command::Record {
            client,
            product,
            quantity,
        } => record(&settings, &store, client, product, quantity),
        Command::Pay { client, method } => pay(&store, &client, &method),
        Command::Clients { unpaid } => clients(&store, unpaid),
        Command::Report { date, html } => report(&settings, &store, date.as_deref(), html),
        Command::Invoice { client } => invoice(&store, &client),
        Command::Close { yes } => close(&settings, &store, yes),
    }
}

fn menu(settings: &Settings) -> Result<()> {
    let catalog = CatalogStore::new(settings.menu_path()).load()?;
    if catalog.is_empty() {
        println!("El menú está vacío.");
        return Ok(());
    }
    for item in catalog.items() {
        println!(
            "{:>3}  {:<30} {:>12}  {:>12}",
            item.id,
            item.name,
            render::money(item.unit_price),
            render::money(item.unit_profit)
        );
    }
    Ok(())
}

fn record(
    settings: &Settings,
    store: &LedgerStore,
    client: String,
    product: String,
    quantity: u32,
) -> Result<()> {
    let catalog = CatalogStore::new(settings.menu_path()).load()?;
    let record = NewConsumption::new(client, product, quantity).into_record(&catalog, today())?;
    let summary = format!(
        "Consumo registrado: {} x{} para {} ({})",
        record.product,
        record.quantity,
        record.client,
        render::money(record.amount_total)
    );
    store.append(record)?;
    println!("{summary}");
    Ok(())
}

fn pay(store: &LedgerStore, client: &str, method: &str) -> Result<()> {
    let method: PaymentMethod = method
        .parse()
        .with_context(|| format!("'{method}' is not a recognized payment method"))?;
    let updated = store.assign_payment(client, method)?;
    if updated.is_empty() {
        // Not an error by contract, but almost certainly a typo'd name.
        bail!("no hay consumos para el cliente '{client}'");
    }
    println!(
        "Pago registrado para {client}: {method} ({} consumos)",
        updated.len()
    );
    Ok(())
}

fn clients(store: &LedgerStore, unpaid: bool) -> Result<()> {
    let names = if unpaid {
        store.unpaid_clients()?
    } else {
        store.clients()?
    };
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn report(
    settings: &Settings,
    store: &LedgerStore,
    date: Option<&str>,
    html: bool,
) -> Result<()> {
    let date = match date {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };
    let rows = store.load()?;
    let report = DailyReport::build(&rows, date);
    print!("{}", render::daily_report_text(&report));
    if html {
        let path = settings
            .backup_path()
            .join(format!("reporte_diario_{}.html", date.format("%Y-%m-%d")));
        fs::write(&path, render::daily_report_html(&report))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "exported HTML report");
        println!("Reporte HTML guardado en {}", path.display());
    }
    Ok(())
}

fn invoice(store: &LedgerStore, client: &str) -> Result<()> {
    let rows = store.load()?;
    let statement = ClientStatement::build(&rows, client);
    if statement.is_empty() {
        println!("No se encontraron consumos para este cliente.");
        return Ok(());
    }
    print!("{}", render::invoice_text(&statement));
    Ok(())
}

fn close(settings: &Settings, store: &LedgerStore, yes: bool) -> Result<()> {
    let preview = store.preview_close()?;
    if preview.requires_confirmation() {
        println!(
            "Faltan {} consumos por pagar con un total de {}.",
            preview.unpaid.len(),
            render::money(preview.unpaid_total)
        );
        for row in &preview.unpaid {
            println!("  {:<30} {:>14}", row.client, render::money(row.amount_total));
        }
        if !yes {
            bail!("cierre cancelado: vuelva a ejecutar con --yes para archivar los consumos sin pagar");
        }
    }
    let snapshot = store.close_day(&settings.backup_path(), today())?;
    println!(
        "Día cerrado. {} consumos guardados en {}",
        snapshot.rows.len(),
        snapshot.path.display()
    );
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}
