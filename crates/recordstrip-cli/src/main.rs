//! RecordsTrip terminal client: trips, debts, expenses and earnings for
//! independent drivers, backed by the hosted row-store.

mod commands;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use recordstrip_core::chart::ChartWindow;

#[derive(Parser)]
#[command(name = "recordstrip")]
#[command(about = "Sua jornada, seus ganhos, sob controle.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with e-mail or phone and cache the driver profile
    Login {
        /// E-mail or phone number
        identifier: String,
        password: String,
    },
    /// Discard the cached driver profile
    Logout,
    /// List passengers with their paid/pending balances
    Passengers {
        /// Filter by name or phone substring
        #[arg(long)]
        search: Option<String>,
    },
    /// Register a passenger
    AddPassenger {
        full_name: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Mark as favorite for frequent trips
        #[arg(long)]
        favorite: bool,
        /// Print a WhatsApp welcome link afterwards
        #[arg(long)]
        welcome: bool,
    },
    /// Record a trip for a passenger (name or id)
    Trip {
        passenger: String,
        amount: f64,
        /// Record as pending instead of paid
        #[arg(long)]
        pending: bool,
        #[arg(long)]
        notes: Option<String>,
        /// Trip date, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Flip one trip between paid and pending
    Toggle { trip_id: Uuid },
    /// Mark every pending trip of a passenger as paid
    Settle { passenger: String },
    /// Trip history grouped per passenger
    History,
    /// Earnings summary plus the income/expense chart
    Earnings {
        /// today, week, month, 3m, 6m or year
        #[arg(long, default_value = "week")]
        window: ChartWindow,
    },
    /// Record an expense
    Expense {
        amount: f64,
        #[arg(long, default_value = "Combustível")]
        category: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Recent expenses and the known categories
    Expenses,
    /// Print a WhatsApp charge link for a passenger's pending balance
    Charge { passenger: String },
    /// Show or edit the driver profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Manage driver access (admin only)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        license_plate: Option<String>,
        #[arg(long)]
        vehicle_model: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        pix_key: Option<String>,
        #[arg(long)]
        show_license_plate: Option<bool>,
        #[arg(long)]
        include_signature: Option<bool>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// All drivers, ordered by name
    List {
        /// Filter by name or vehicle substring
        #[arg(long)]
        search: Option<String>,
    },
    /// Register a driver with a legacy starter password
    Add {
        full_name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long, default_value = "")]
        vehicle: String,
        #[arg(long, default_value = "")]
        plate: String,
        /// Grant the admin flag
        #[arg(long)]
        admin: bool,
    },
    Activate { id: Uuid },
    Deactivate { id: Uuid },
    Delete { id: Uuid },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    recordstrip_core::observability::init_observability();

    let cli = Cli::parse();
    let app = commands::App::from_env()?;

    match cli.command {
        Commands::Login {
            identifier,
            password,
        } => app.login(&identifier, &password).await,
        Commands::Logout => app.logout(),
        Commands::Passengers { search } => app.passengers(search.as_deref()).await,
        Commands::AddPassenger {
            full_name,
            phone,
            favorite,
            welcome,
        } => app.add_passenger(full_name, phone, favorite, welcome).await,
        Commands::Trip {
            passenger,
            amount,
            pending,
            notes,
            date,
        } => app.record_trip(&passenger, amount, pending, notes, date).await,
        Commands::Toggle { trip_id } => app.toggle_trip(trip_id).await,
        Commands::Settle { passenger } => app.settle(&passenger).await,
        Commands::History => app.history().await,
        Commands::Earnings { window } => app.earnings(window).await,
        Commands::Expense {
            amount,
            category,
            description,
        } => app.add_expense(amount, category, description).await,
        Commands::Expenses => app.expenses().await,
        Commands::Charge { passenger } => app.charge(&passenger).await,
        Commands::Profile { action } => match action {
            ProfileAction::Show => app.show_profile().await,
            ProfileAction::Update {
                full_name,
                license_plate,
                vehicle_model,
                phone,
                pix_key,
                show_license_plate,
                include_signature,
            } => {
                app.update_profile(
                    full_name,
                    license_plate,
                    vehicle_model,
                    phone,
                    pix_key,
                    show_license_plate,
                    include_signature,
                )
                .await
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::List { search } => app.admin_list(search.as_deref()).await,
            AdminAction::Add {
                full_name,
                phone,
                email,
                password,
                vehicle,
                plate,
                admin,
            } => {
                app.admin_add(full_name, phone, email, password, vehicle, plate, admin)
                    .await
            }
            AdminAction::Activate { id } => app.admin_set_active(id, true).await,
            AdminAction::Deactivate { id } => app.admin_set_active(id, false).await,
            AdminAction::Delete { id } => app.admin_delete(id).await,
        },
    }
}
