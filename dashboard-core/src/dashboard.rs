//! Headless dashboard state: the search query, the current snapshot and the
//! fetch lifecycle that connects them.
//!
//! A fetch is split into three steps so that overlapping searches can be
//! driven from a single task:
//!
//! 1. [`Dashboard::begin_fetch`] validates the input, checks the credential
//!    and stamps the request with a fresh [`Generation`].
//! 2. [`PendingFetch::run`] performs the network call without borrowing the
//!    dashboard.
//! 3. [`Dashboard::finish_fetch`] applies the result, but only if no newer
//!    fetch was started in the meantime.
//!
//! [`Dashboard::fetch`] chains the three for the common case.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    credential::{ApiKey, Credential},
    error::FetchError,
    model::{CityName, WeatherSnapshot},
    notify::Notification,
    prefs::PreferenceStore,
    present::{SetupNotice, WeatherView},
    provider::WeatherProvider,
};

/// User intents understood by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the search query text.
    EditQuery(String),
    /// Search with whatever the query currently holds.
    Submit,
}

/// Monotonic stamp identifying a fetch. Only the latest one may touch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(u64);

/// Keeps the loading counter raised for as long as it is alive.
#[derive(Debug)]
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A validated request that has not hit the network yet.
#[derive(Debug)]
pub struct PendingFetch {
    generation: Generation,
    city: CityName,
    api_key: ApiKey,
    provider: Arc<dyn WeatherProvider>,
    in_flight: InFlight,
}

impl PendingFetch {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn city(&self) -> &CityName {
        &self.city
    }

    pub async fn run(self) -> FetchOutcome {
        tracing::debug!(city = %self.city, generation = self.generation.0, "fetching weather");
        let result = self.provider.current_weather(&self.city, &self.api_key).await;
        FetchOutcome {
            generation: self.generation,
            city: self.city,
            result,
            _in_flight: self.in_flight,
        }
    }
}

/// Settled network call waiting to be applied.
#[derive(Debug)]
pub struct FetchOutcome {
    generation: Generation,
    city: CityName,
    result: Result<WeatherSnapshot, FetchError>,
    _in_flight: InFlight,
}

impl FetchOutcome {
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

#[derive(Debug)]
pub struct Dashboard {
    query: String,
    snapshot: Option<WeatherSnapshot>,
    latest: Generation,
    in_flight: Arc<AtomicUsize>,
    mounted: bool,
    credential: Credential,
    provider: Arc<dyn WeatherProvider>,
    prefs: Box<dyn PreferenceStore>,
}

impl Dashboard {
    pub fn new(
        credential: Credential,
        provider: Arc<dyn WeatherProvider>,
        prefs: impl PreferenceStore + 'static,
    ) -> Self {
        Self {
            query: String::new(),
            snapshot: None,
            latest: Generation::default(),
            in_flight: Arc::new(AtomicUsize::new(0)),
            mounted: false,
            credential,
            provider,
            prefs: Box::new(prefs),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn view(&self) -> Option<WeatherView> {
        self.snapshot.as_ref().map(WeatherView::from_snapshot)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_present()
    }

    /// `Some` while no API key is configured.
    pub fn setup_notice(&self) -> Option<SetupNotice> {
        (!self.credential.is_present()).then(SetupNotice::new)
    }

    pub async fn dispatch(&mut self, command: Command) -> Option<Notification> {
        match command {
            Command::EditQuery(text) => {
                self.query = text;
                None
            }
            Command::Submit => {
                let query = self.query.clone();
                self.fetch(&query).await
            }
        }
    }

    /// Startup preload: fetch the remembered city once, if there is one and a
    /// credential is configured. Later calls do nothing.
    pub async fn mount(&mut self) -> Option<Notification> {
        if self.mounted {
            return None;
        }
        self.mounted = true;

        if !self.credential.is_present() {
            return None;
        }

        let city = match self.prefs.last_city() {
            Ok(Some(city)) => city,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "could not read last searched city");
                return None;
            }
        };

        tracing::info!(%city, "preloading last searched city");
        self.fetch(&city).await
    }

    /// Runs one complete fetch. Returns `None` only if the result was
    /// superseded by a newer fetch before it could be applied.
    pub async fn fetch(&mut self, city: &str) -> Option<Notification> {
        match self.begin_fetch(city) {
            Ok(pending) => {
                let outcome = pending.run().await;
                self.finish_fetch(outcome)
            }
            Err(notification) => Some(notification),
        }
    }

    /// Validates and stamps a fetch. Local failures (blank city, no
    /// credential) are applied immediately and returned as the error.
    pub fn begin_fetch(&mut self, city: &str) -> Result<PendingFetch, Notification> {
        self.latest = Generation(self.latest.0 + 1);

        let checked = CityName::parse(city).and_then(|city| {
            let api_key = self.credential.api_key().cloned().ok_or(FetchError::MissingCredential)?;
            Ok((city, api_key))
        });

        match checked {
            Ok((city, api_key)) => Ok(PendingFetch {
                generation: self.latest,
                city,
                api_key,
                provider: Arc::clone(&self.provider),
                in_flight: InFlight::enter(&self.in_flight),
            }),
            Err(err) => Err(self.apply_failure(&err)),
        }
    }

    /// Applies a settled fetch. Stale outcomes are dropped and yield `None`.
    pub fn finish_fetch(&mut self, outcome: FetchOutcome) -> Option<Notification> {
        let FetchOutcome { generation, city, result, _in_flight: in_flight } = outcome;
        drop(in_flight);

        if generation != self.latest {
            tracing::debug!(%city, generation = generation.0, "discarding stale weather response");
            return None;
        }

        let notification = match result {
            Ok(snapshot) => {
                if let Err(err) = self.prefs.set_last_city(city.as_str()) {
                    tracing::warn!(error = %format!("{err:#}"), "could not persist last searched city");
                }
                tracing::info!(%city, location = %snapshot.location_name, "weather loaded");
                let notification = Notification::loaded(&snapshot.location_name);
                self.snapshot = Some(snapshot);
                notification
            }
            Err(err) => self.apply_failure(&err),
        };
        Some(notification)
    }

    fn apply_failure(&mut self, err: &FetchError) -> Notification {
        if err.is_local() {
            tracing::debug!(error = %err, "search rejected");
        } else {
            tracing::warn!(error = %err, "weather fetch failed");
        }
        self.snapshot = None;
        Notification::failed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{notify::NotificationKind, prefs::MemoryPreferenceStore};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    /// Answers from a fixed table and records every city it was asked for.
    #[derive(Debug, Default)]
    struct ScriptedProvider {
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn snapshot_for(name: &str, temp: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: name.to_string(),
            country: "XX".into(),
            condition: "Clear".into(),
            description: "clear sky".into(),
            temperature_c: temp,
            feels_like_c: temp,
            humidity_pct: 50,
            wind_speed_mps: 1.0,
            observed_at: None,
        }
    }

    #[async_trait]
    impl WeatherProvider for ScriptedProvider {
        async fn current_weather(
            &self,
            city: &CityName,
            _api_key: &ApiKey,
        ) -> Result<WeatherSnapshot, FetchError> {
            self.calls.lock().unwrap().push(city.to_string());
            match city.as_str() {
                "Atlantis" => Err(FetchError::CityNotFound),
                "Broken" => Err(FetchError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: None,
                }),
                "Paris" => Ok(snapshot_for("Paris", 18.0)),
                other => Ok(snapshot_for(other, 20.0)),
            }
        }
    }

    fn key() -> Credential {
        Credential::from_raw(Some("KEY"))
    }

    fn dashboard(
        credential: Credential,
        prefs: MemoryPreferenceStore,
    ) -> (Dashboard, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::default());
        let dash = Dashboard::new(credential, provider.clone(), prefs);
        (dash, provider)
    }

    #[tokio::test]
    async fn successful_fetch_sets_snapshot_and_remembers_city() {
        let prefs = MemoryPreferenceStore::default();
        let (mut dash, provider) = dashboard(key(), prefs.clone());

        let n = dash.fetch("Berlin").await.unwrap();

        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.description, "Weather data loaded for Berlin");
        assert_eq!(dash.snapshot(), Some(&snapshot_for("Berlin", 20.0)));
        assert_eq!(prefs.last_city().unwrap().as_deref(), Some("Berlin"));
        assert_eq!(provider.calls(), vec!["Berlin"]);
        assert!(!dash.is_loading());
    }

    #[tokio::test]
    async fn blank_query_never_reaches_provider() {
        let (mut dash, provider) = dashboard(key(), MemoryPreferenceStore::default());

        for input in ["", "   ", "\t\n"] {
            let n = dash.fetch(input).await.unwrap();
            assert!(n.is_error());
            assert_eq!(n.description, "Please enter a city name");
        }

        assert!(provider.calls().is_empty());
        assert!(!dash.is_loading());
    }

    #[tokio::test]
    async fn missing_credential_never_reaches_provider() {
        let (mut dash, provider) = dashboard(Credential::Absent, MemoryPreferenceStore::default());

        let n = dash.fetch("Berlin").await.unwrap();

        assert_eq!(n.title, "API Key Required");
        assert!(provider.calls().is_empty());
        assert!(dash.setup_notice().is_some());
        assert!(dash.snapshot().is_none());
    }

    #[tokio::test]
    async fn failure_clears_previous_snapshot() {
        let prefs = MemoryPreferenceStore::default();
        let (mut dash, _) = dashboard(key(), prefs.clone());

        dash.fetch("Berlin").await;
        assert!(dash.snapshot().is_some());

        let n = dash.fetch("Atlantis").await.unwrap();
        assert!(n.is_error());
        assert_eq!(n.description, "City not found");
        assert!(dash.snapshot().is_none());
        assert_eq!(prefs.last_city().unwrap().as_deref(), Some("Berlin"));
    }

    #[tokio::test]
    async fn generic_message_when_provider_gives_no_reason() {
        let (mut dash, _) = dashboard(key(), MemoryPreferenceStore::default());
        let n = dash.fetch("Broken").await.unwrap();
        assert_eq!(n.description, "Failed to fetch weather data");
    }

    #[tokio::test]
    async fn validation_error_also_clears_snapshot() {
        let (mut dash, _) = dashboard(key(), MemoryPreferenceStore::default());
        dash.fetch("Berlin").await;
        dash.fetch("  ").await;
        assert!(dash.snapshot().is_none());
    }

    #[tokio::test]
    async fn submit_uses_current_query() {
        let (mut dash, provider) = dashboard(key(), MemoryPreferenceStore::default());

        assert!(dash.dispatch(Command::EditQuery("Lis".into())).await.is_none());
        assert!(dash.dispatch(Command::EditQuery("Lisbon".into())).await.is_none());
        assert!(provider.calls().is_empty());

        let n = dash.dispatch(Command::Submit).await.unwrap();
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(provider.calls(), vec!["Lisbon"]);
        assert_eq!(dash.query(), "Lisbon");
    }

    #[tokio::test]
    async fn mount_preloads_remembered_city_exactly_once() {
        let prefs = MemoryPreferenceStore::with_last_city("Paris");
        let (mut dash, provider) = dashboard(key(), prefs);

        let n = dash.mount().await.unwrap();
        assert_eq!(n.description, "Weather data loaded for Paris");
        assert!(dash.mount().await.is_none());

        assert_eq!(provider.calls(), vec!["Paris"]);
        assert_eq!(dash.view().unwrap().temperature_label(), "18°C");
    }

    #[tokio::test]
    async fn mount_without_credential_does_nothing() {
        let prefs = MemoryPreferenceStore::with_last_city("Paris");
        let (mut dash, provider) = dashboard(Credential::Absent, prefs);

        assert!(dash.mount().await.is_none());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn mount_without_remembered_city_does_nothing() {
        let (mut dash, provider) = dashboard(key(), MemoryPreferenceStore::default());
        assert!(dash.mount().await.is_none());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let prefs = MemoryPreferenceStore::default();
        let (mut dash, provider) = dashboard(key(), prefs.clone());

        let first = dash.begin_fetch("Berlin").unwrap();
        let second = dash.begin_fetch("Oslo").unwrap();
        assert!(first.generation() < second.generation());
        assert!(dash.is_loading());

        let (first, second) = tokio::join!(first.run(), second.run());
        assert_eq!(provider.calls().len(), 2);

        let n = dash.finish_fetch(second).unwrap();
        assert_eq!(n.description, "Weather data loaded for Oslo");
        assert!(dash.is_loading());

        assert!(dash.finish_fetch(first).is_none());
        assert!(!dash.is_loading());
        assert_eq!(dash.snapshot().unwrap().location_name, "Oslo");
        assert_eq!(prefs.last_city().unwrap().as_deref(), Some("Oslo"));
    }

    #[tokio::test]
    async fn stale_failure_does_not_clear_newer_snapshot() {
        let (mut dash, _) = dashboard(key(), MemoryPreferenceStore::default());

        let old = dash.begin_fetch("Atlantis").unwrap().run().await;
        let new = dash.begin_fetch("Oslo").unwrap().run().await;

        assert!(dash.finish_fetch(new).is_some());
        assert!(dash.finish_fetch(old).is_none());
        assert_eq!(dash.snapshot().unwrap().location_name, "Oslo");
    }

    #[tokio::test]
    async fn dropped_fetch_lowers_loading_flag() {
        let (mut dash, _) = dashboard(key(), MemoryPreferenceStore::default());

        let pending = dash.begin_fetch("Berlin").unwrap();
        assert!(dash.is_loading());
        drop(pending);
        assert!(!dash.is_loading());
    }
}
