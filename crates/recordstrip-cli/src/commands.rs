use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use uuid::Uuid;

use recordstrip_core::balance;
use recordstrip_core::chart::{ChartBucket, ChartWindow, build_chart};
use recordstrip_core::history::group_trips;
use recordstrip_core::model::{DocumentKind, NewDriverProfile, NewExpense, NewPassenger, NewTrip,
    Passenger, ProfileUpdate, TripStatus, expense_categories};
use recordstrip_remote::store::{ExpenseStore, PassengerStore, ProfileStore, TripStore};
use recordstrip_remote::{DriverSession, LoginOutcome, LoginResolver, ProfileCache, RemoteConfig,
    RestAuthClient, RestRowStore, whatsapp};

/// Wires config, clients and the cached session for the subcommands.
pub struct App {
    store: RestRowStore,
    auth: Arc<RestAuthClient>,
    cache: ProfileCache,
}

fn cache_path() -> PathBuf {
    std::env::var("RECORDSTRIP_PROFILE_CACHE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".recordstrip/profile.json"))
}

fn status_label(status: TripStatus) -> &'static str {
    match status {
        TripStatus::Paid => "pago",
        TripStatus::Pending => "pendente",
    }
}

fn document_label(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::ReportLogo => "Logo do relatório",
        DocumentKind::Signature => "Assinatura",
        DocumentKind::CarDocument => "Documento do veículo",
        DocumentKind::DriverLicense => "CNH",
    }
}

impl App {
    pub fn from_env() -> Result<Self> {
        let config = RemoteConfig::from_env()?;
        Ok(Self {
            store: RestRowStore::new(config.clone())?,
            auth: Arc::new(RestAuthClient::new(config)?),
            cache: ProfileCache::new(cache_path()),
        })
    }

    /// The current driver session; every driver-scoped call takes it from
    /// here explicitly. Falls back to the first profile row when nothing is
    /// cached (the legacy single-tenant boot path), and blocks deactivated
    /// profiles regardless of how they were resolved.
    async fn session(&self) -> Result<DriverSession> {
        let profile = match self.cache.load() {
            Some(profile) => profile,
            None => self
                .store
                .profiles
                .first()
                .await?
                .context("nenhum motorista conectado; rode `recordstrip login` primeiro")?,
        };
        if !profile.is_active {
            bail!("Seu acesso está desativado. Contate o administrador.");
        }
        Ok(DriverSession::new(profile))
    }

    async fn resolve_passenger(&self, needle: &str) -> Result<Passenger> {
        let passengers = self.store.passengers.list().await?;
        if let Ok(id) = Uuid::parse_str(needle) {
            return passengers
                .into_iter()
                .find(|p| p.id == id)
                .with_context(|| format!("nenhum passageiro com id {id}"));
        }
        let lowered = needle.to_lowercase();
        let matches: Vec<&Passenger> = passengers
            .iter()
            .filter(|p| p.full_name.to_lowercase().contains(&lowered))
            .collect();
        match matches.as_slice() {
            [] => bail!("nenhum passageiro encontrado para \"{needle}\""),
            [only] => Ok((*only).clone()),
            several => {
                if let Some(exact) = several.iter().find(|p| p.full_name.to_lowercase() == lowered)
                {
                    return Ok((*exact).clone());
                }
                bail!(
                    "\"{needle}\" é ambíguo: {}",
                    several
                        .iter()
                        .map(|p| p.full_name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
        }
    }

    pub async fn login(&self, identifier: &str, password: &str) -> Result<()> {
        let resolver = LoginResolver::new(self.store.profiles.clone(), self.auth.clone());
        match resolver.resolve(identifier, password).await? {
            LoginOutcome::Authenticated(profile) => {
                self.cache
                    .save(&profile)
                    .context("failed to cache the driver profile")?;
                println!("Bem-vindo, {}!", profile.full_name);
                Ok(())
            }
            LoginOutcome::Rejected(rejection) => bail!("{}", rejection.message()),
        }
    }

    pub fn logout(&self) -> Result<()> {
        self.cache.clear().context("failed to clear the cached profile")?;
        println!("Sessão encerrada.");
        Ok(())
    }

    pub async fn passengers(&self, search: Option<&str>) -> Result<()> {
        let passengers = self.store.passengers.list().await?;
        let trips = self.store.trips.history().await?;
        let balances = balance::passenger_balances(&trips);

        let lowered = search.map(str::to_lowercase);
        let mut shown = 0;
        for passenger in &passengers {
            if let Some(needle) = &lowered
                && !passenger.full_name.to_lowercase().contains(needle)
                && !passenger.phone_number.contains(needle.as_str())
            {
                continue;
            }
            let bal = balances.get(&passenger.id).copied().unwrap_or_default();
            println!(
                "{:<28} {:<18} pago R$ {:>8.2}  pendente R$ {:>8.2}",
                passenger.full_name, passenger.phone_number, bal.paid, bal.pending
            );
            shown += 1;
        }
        if shown == 0 {
            println!("Nenhum passageiro encontrado");
        }
        Ok(())
    }

    pub async fn add_passenger(
        &self,
        full_name: String,
        phone: String,
        favorite: bool,
        welcome: bool,
    ) -> Result<()> {
        let passenger = self
            .store
            .passengers
            .create(NewPassenger {
                full_name,
                phone_number: phone,
                is_favorite: favorite,
                passenger_class: None,
                driver_id: None,
            })
            .await?;
        println!("Passageiro cadastrado: {} ({})", passenger.full_name, passenger.id);

        if welcome {
            let session = self.session().await?;
            match whatsapp::welcome_link(&passenger, &session.profile().full_name) {
                Some(link) => println!("{link}"),
                None => println!("Sem telefone cadastrado, nenhum link de boas-vindas."),
            }
        }
        Ok(())
    }

    pub async fn record_trip(
        &self,
        passenger: &str,
        amount: f64,
        pending: bool,
        notes: Option<String>,
        date: Option<NaiveDate>,
    ) -> Result<()> {
        let passenger = self.resolve_passenger(passenger).await?;
        let open = self.store.trips.pending_for_passenger(passenger.id).await?;
        let owed = balance::pending_total(&open);
        if owed > 0.0 {
            println!(
                "Dívida pendente de {}: R$ {owed:.2} (quite com `recordstrip settle`)",
                passenger.full_name
            );
        }

        let status = if pending { TripStatus::Pending } else { TripStatus::Paid };
        let trip = self
            .store
            .trips
            .record(NewTrip {
                passenger_id: passenger.id,
                trip_date: date.unwrap_or_else(|| Local::now().date_naive()),
                amount,
                status,
                notes,
            })
            .await?;
        println!(
            "Viagem salva: {} — R$ {:.2} ({}) em {}",
            passenger.full_name,
            trip.amount,
            status_label(trip.status),
            trip.trip_date
        );
        Ok(())
    }

    pub async fn toggle_trip(&self, trip_id: Uuid) -> Result<()> {
        let trips = self.store.trips.history().await?;
        let trip = trips
            .iter()
            .find(|t| t.id == trip_id)
            .with_context(|| format!("nenhuma viagem com id {trip_id}"))?;
        let status = trip.status.toggled();
        self.store.trips.set_status(trip_id, status).await?;
        println!("Viagem {trip_id} agora está {}", status_label(status));
        Ok(())
    }

    pub async fn settle(&self, passenger: &str) -> Result<()> {
        let passenger = self.resolve_passenger(passenger).await?;
        let open = self.store.trips.pending_for_passenger(passenger.id).await?;
        let owed = balance::pending_total(&open);
        if owed <= 0.0 {
            println!("{} não tem pendências.", passenger.full_name);
            return Ok(());
        }
        self.store.trips.settle_passenger(passenger.id).await?;
        println!(
            "Todas as pendências de {} foram pagas! (R$ {owed:.2})",
            passenger.full_name
        );
        Ok(())
    }

    pub async fn history(&self) -> Result<()> {
        let trips = self.store.trips.history().await?;
        if trips.is_empty() {
            println!("Nenhuma viagem encontrada");
            return Ok(());
        }
        for group in group_trips(&trips) {
            let badge = if group.has_pending_trip { "PENDENTE" } else { "PAGO" };
            println!(
                "{}  {:<28} {:>3} viagens  R$ {:>9.2}  {}",
                group.latest_trip_date,
                group.display_name(),
                group.trip_ids.len(),
                group.total_amount,
                badge
            );
        }
        Ok(())
    }

    pub async fn earnings(&self, window: ChartWindow) -> Result<()> {
        let session = self.session().await?;
        let trips = self.store.trips.history().await?;
        let expenses = self.store.expenses.for_driver(session.driver_id()).await?;

        let summary = balance::earnings_summary(&trips);
        println!("RECEITA TOTAL    R$ {:>9.2}", summary.total);
        println!("Coletado         R$ {:>9.2}", summary.paid);
        println!("Pendente         R$ {:>9.2}", summary.pending);
        println!(
            "Média por viagem R$ {:>9.2} ({} viagens)",
            summary.average(),
            summary.count
        );
        println!();

        let today = Local::now().date_naive();
        print_chart(&build_chart(today, window, &trips, &expenses));
        Ok(())
    }

    pub async fn add_expense(
        &self,
        amount: f64,
        category: String,
        description: Option<String>,
    ) -> Result<()> {
        let session = self.session().await?;
        let expense = self
            .store
            .expenses
            .create(NewExpense {
                driver_id: session.driver_id(),
                amount,
                category,
                description,
                expense_date: Local::now().date_naive(),
            })
            .await?;
        println!("Gasto salvo: {} — R$ {:.2}", expense.category, expense.amount);
        Ok(())
    }

    pub async fn expenses(&self) -> Result<()> {
        let session = self.session().await?;
        let expenses = self.store.expenses.for_driver(session.driver_id()).await?;
        if expenses.is_empty() {
            println!("Nenhum gasto registrado recentemente.");
            return Ok(());
        }
        for expense in expenses.iter().take(10) {
            println!(
                "{}  {:<20} R$ {:>8.2}  {}",
                expense.expense_date,
                expense.category,
                expense.amount,
                expense.description.as_deref().unwrap_or("")
            );
        }
        println!();
        println!("Categorias: {}", expense_categories(&expenses).join(", "));
        Ok(())
    }

    pub async fn charge(&self, passenger: &str) -> Result<()> {
        let session = self.session().await?;
        let passenger = self.resolve_passenger(passenger).await?;
        let open = self.store.trips.pending_for_passenger(passenger.id).await?;
        let owed = balance::pending_total(&open);
        if owed <= 0.0 {
            println!("{} não tem pendências.", passenger.full_name);
            return Ok(());
        }
        match whatsapp::charge_link(&passenger, owed, session.profile().pix_key.as_deref()) {
            Some(link) => println!("{link}"),
            None => bail!("{} não tem telefone cadastrado", passenger.full_name),
        }
        Ok(())
    }

    pub async fn show_profile(&self) -> Result<()> {
        let session = self.session().await?;
        let profile = self
            .store
            .profiles
            .by_id(session.driver_id())
            .await?
            .unwrap_or_else(|| session.profile().clone());

        println!("{}", profile.full_name);
        println!("Veículo: {} • {}", profile.vehicle_model, profile.license_plate);
        println!("Telefone: {}", profile.phone_number);
        if let Some(email) = &profile.email {
            println!("E-mail: {email}");
        }
        if let Some(pix) = &profile.pix_key {
            println!("PIX: {pix}");
        }
        println!(
            "Mostrar placa: {}  Incluir assinatura: {}",
            if profile.show_license_plate { "sim" } else { "não" },
            if profile.include_signature { "sim" } else { "não" }
        );
        for kind in DocumentKind::ALL {
            let state = if profile.documents.is_uploaded(kind) { "enviado" } else { "pendente" };
            println!("{:<22} {}", document_label(kind), state);
        }
        if profile.is_admin {
            println!("Perfil administrador");
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_profile(
        &self,
        full_name: Option<String>,
        license_plate: Option<String>,
        vehicle_model: Option<String>,
        phone: Option<String>,
        pix_key: Option<String>,
        show_license_plate: Option<bool>,
        include_signature: Option<bool>,
    ) -> Result<()> {
        let session = self.session().await?;
        let current = self
            .store
            .profiles
            .by_id(session.driver_id())
            .await?
            .context("perfil não encontrado")?;

        let update = ProfileUpdate {
            full_name: full_name.unwrap_or_else(|| current.full_name.clone()),
            license_plate: license_plate.unwrap_or_else(|| current.license_plate.clone()),
            vehicle_model: vehicle_model.unwrap_or_else(|| current.vehicle_model.clone()),
            phone_number: phone.unwrap_or_else(|| current.phone_number.clone()),
            show_license_plate: show_license_plate.unwrap_or(current.show_license_plate),
            include_signature: include_signature.unwrap_or(current.include_signature),
            pix_key: pix_key.or_else(|| current.pix_key.clone()),
        };
        self.store.profiles.update_profile(current.id, update).await?;

        if let Some(refreshed) = self.store.profiles.by_id(current.id).await? {
            let _ = self.cache.save(&refreshed);
        }
        println!("Perfil atualizado!");
        Ok(())
    }

    pub async fn admin_list(&self, search: Option<&str>) -> Result<()> {
        let session = self.session().await?;
        session.require_admin()?;

        let drivers = self.store.profiles.list().await?;
        let lowered = search.map(str::to_lowercase);
        for driver in &drivers {
            if let Some(needle) = &lowered
                && !driver.full_name.to_lowercase().contains(needle)
                && !driver.vehicle_model.to_lowercase().contains(needle)
            {
                continue;
            }
            println!(
                "{}  {:<28} {:<24} {}",
                driver.id,
                driver.full_name,
                format!("{} • {}", driver.vehicle_model, driver.license_plate),
                if driver.is_active { "ATIVO" } else { "INATIVO" }
            );
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn admin_add(
        &self,
        full_name: String,
        phone: String,
        email: Option<String>,
        password: Option<String>,
        vehicle: String,
        plate: String,
        admin: bool,
    ) -> Result<()> {
        let session = self.session().await?;
        session.require_admin()?;
        let driver = self
            .store
            .profiles
            .create(NewDriverProfile {
                full_name,
                phone_number: phone,
                email,
                password,
                vehicle_model: vehicle,
                license_plate: plate,
                is_active: true,
                is_admin: admin,
                pix_key: None,
            })
            .await?;
        println!("Motorista cadastrado: {} ({})", driver.full_name, driver.id);
        Ok(())
    }

    pub async fn admin_set_active(&self, id: Uuid, active: bool) -> Result<()> {
        let session = self.session().await?;
        session.require_admin()?;
        self.store.profiles.set_active(id, active).await?;
        println!(
            "Motorista {id} {}",
            if active { "ativado" } else { "desativado" }
        );
        Ok(())
    }

    pub async fn admin_delete(&self, id: Uuid) -> Result<()> {
        let session = self.session().await?;
        session.require_admin()?;
        self.store.profiles.delete(id).await?;
        println!("Motorista {id} removido");
        Ok(())
    }
}

fn print_chart(buckets: &[ChartBucket]) {
    let max = buckets
        .iter()
        .map(|b| b.income.max(b.expense))
        .fold(0.0_f64, f64::max);
    for bucket in buckets {
        let marker = if bucket.is_current_period { "◂" } else { " " };
        println!(
            "{:>4}  {:<24}  +R$ {:>8.2}  -R$ {:>8.2} {}",
            bucket.label,
            bar(bucket.income, max),
            bucket.income,
            bucket.expense,
            marker
        );
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let width = ((value / max) * 24.0).round() as usize;
    "█".repeat(width)
}
