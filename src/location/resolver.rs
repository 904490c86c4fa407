//! Location resolver: orchestrates the lookup chain and places the subject.
//!
//! Address flow:  private? → skip | Cache → IP provider → cache store → place
//! Place flow:    Cache → geocoder → cache store → place
//!                (no HTTP collaborator: built-in dataset → error)
//!
//! Identical lookups already in flight are not coalesced; each one that
//! misses the cache issues its own request.

use super::cache::ResolutionCache;
use super::classifier;
use super::providers::{self, ProviderGateway};
use super::types::{
    format_coords, FixSource, GeoFix, LocationError, LookupKey, LookupRequest, LookupTarget, Placement,
};
use crate::command::{parse_command, validate_coords, CommandReply};
use crate::config::GeoConfig;
use crate::http::HttpClient;
use crate::projection;
use crate::session::{Session, SessionEvent, Terrain};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The lookup orchestrator.
pub struct LocationResolver {
    config: Arc<GeoConfig>,
    cache: Arc<ResolutionCache>,
    gateway: ProviderGateway,
}

impl LocationResolver {
    /// `http == None` means no HTTP capability at all.
    pub fn new(config: GeoConfig, http: Option<Arc<dyn HttpClient>>) -> Self {
        let cache = Arc::new(ResolutionCache::new(config.cache_ttl));
        Self::with_cache(config, http, cache)
    }

    /// Create a resolver with a specific cache (for testing).
    pub fn with_cache(
        config: GeoConfig,
        http: Option<Arc<dyn HttpClient>>,
        cache: Arc<ResolutionCache>,
    ) -> Self {
        let gateway = ProviderGateway::new(&config, http);
        Self {
            config: Arc::new(config),
            cache,
            gateway,
        }
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Resolve a network address. `Ok(None)` means the address is private
    /// and was deliberately not looked up.
    pub async fn resolve_address(&self, address: &str) -> Result<Option<GeoFix>, LocationError> {
        let address = classifier::strip_port(address);
        if address.is_empty() {
            return Err(LocationError::InvalidInput("empty address".into()));
        }
        // Only literal IPs reach the URL template unencoded.
        if address.parse::<IpAddr>().is_err() {
            return Err(LocationError::InvalidInput(format!("'{}' is not an IP address", address)));
        }
        if classifier::is_private(address) {
            debug!(%address, "private address, lookup skipped");
            return Ok(None);
        }

        let key = LookupKey::Address(address.to_lowercase());
        if let Some(payload) = self.cache.get(&key) {
            debug!(%key, "cache hit");
            return providers::parse_ip_payload(&payload).map(|fix| Some(from_cache(fix)));
        }

        let url = self.gateway.build_ip_lookup_url(address);
        let payload = self.gateway.fetch(&url).await?;
        // Unusable payloads are cached too, so a bad key is not retried until expiry.
        self.cache.set(key, payload.clone());
        providers::parse_ip_payload(&payload).map(Some)
    }

    /// Resolve a free-text place name.
    pub async fn resolve_place(&self, name: &str) -> Result<GeoFix, LocationError> {
        let name = name.trim();
        let normalized = providers::normalize_place_name(name);
        if normalized.is_empty() {
            return Err(LocationError::InvalidInput(format!("'{}' is not a place name", name)));
        }

        let key = LookupKey::Place(normalized);
        if let Some(payload) = self.cache.get(&key) {
            debug!(%key, "cache hit");
            return providers::parse_geocode_payload(&payload, name).map(from_cache);
        }

        if !self.gateway.is_available() {
            debug!(place = %name, "no HTTP provider, using built-in dataset");
            return providers::builtin_lookup(name)
                .ok_or_else(|| LocationError::UnknownPlace(name.to_string()));
        }

        let url = self.gateway.build_geocode_url(name);
        let payload = self.gateway.fetch(&url).await?;
        self.cache.set(key, payload.clone());
        providers::parse_geocode_payload(&payload, name)
    }

    /// Resolve any lookup target to a fix (`None`: skipped).
    pub async fn resolve(&self, target: &LookupTarget) -> Result<Option<GeoFix>, LocationError> {
        match target {
            LookupTarget::Address(address) => self.resolve_address(address).await,
            LookupTarget::Place(name) => self.resolve_place(name).await.map(Some),
            LookupTarget::Coordinates { lat, lon } => {
                validate_coords(*lat, *lon)?;
                Ok(Some(GeoFix::new(*lat, *lon, FixSource::Manual)))
            }
        }
    }

    /// Project a fix and stand it on the terrain.
    pub fn place(&self, fix: GeoFix, terrain: &dyn Terrain) -> Placement {
        let proj = &self.config.projection;
        let mut position = proj.to_planar(&fix);
        position.y = terrain.ground_height(position.x, position.z) + proj.vertical_offset();
        let label = fix.label();
        Placement { fix, position, label }
    }

    /// Resolve, apply the capability gate, and move the session.
    /// Sends no notifications.
    pub async fn execute(
        &self,
        session: &dyn Session,
        terrain: &dyn Terrain,
        request: &LookupRequest,
    ) -> Result<Option<Placement>, LocationError> {
        let Some(fix) = self.resolve(&request.target).await? else {
            return Ok(None);
        };
        let placement = self.place(fix, terrain);

        if let Err(reason) = session.check_move(&placement.position) {
            warn!(subject = %request.subject, %reason, "move vetoed by client capability");
            return Err(LocationError::CapabilityVeto(reason));
        }

        session.move_to(placement.position);
        info!(
            subject = %request.subject,
            label = %placement.label,
            position = %placement.position,
            source = %placement.fix.source,
            "subject placed"
        );
        Ok(Some(placement))
    }

    /// Run a request and report the outcome to the session.
    pub async fn handle_request(
        &self,
        session: &dyn Session,
        terrain: &dyn Terrain,
        request: LookupRequest,
    ) -> Result<Option<Placement>, LocationError> {
        match self.execute(session, terrain, &request).await {
            Ok(Some(placement)) => {
                session.notify(&placement_message(&request.target, &placement));
                Ok(Some(placement))
            }
            Ok(None) => Ok(None),
            Err(LocationError::ProviderUnavailable) if matches!(request.target, LookupTarget::Address(_)) => {
                debug!(subject = %request.subject, "no HTTP provider, address lookup skipped");
                Ok(None)
            }
            Err(e) => {
                warn!(subject = %request.subject, error = %e, "lookup failed");
                session.notify(&format!("Location lookup failed: {}", e));
                Err(e)
            }
        }
    }

    /// Look up the session's own network address.
    pub async fn locate_session(
        &self,
        session: &dyn Session,
        terrain: &dyn Terrain,
    ) -> Result<Option<Placement>, LocationError> {
        let Some(address) = session.address() else {
            debug!(subject = %session.name(), "no network address, lookup skipped");
            return Ok(None);
        };
        let request = LookupRequest {
            subject: session.name(),
            target: LookupTarget::Address(address),
        };
        self.handle_request(session, terrain, request).await
    }

    /// Whether an event should trigger an automatic address lookup.
    ///
    /// With world-center metadata, lookups run on join; without it they run
    /// on new player/respawn when `auto_on_spawn` is set.
    pub fn should_auto_locate(&self, event: SessionEvent) -> bool {
        if !self.config.enable {
            return false;
        }
        match event {
            SessionEvent::Join => self.config.has_world_center(),
            SessionEvent::NewPlayer | SessionEvent::Respawn => {
                self.config.auto_on_spawn && !self.config.has_world_center()
            }
        }
    }

    pub async fn on_session_event(
        &self,
        session: &dyn Session,
        terrain: &dyn Terrain,
        event: SessionEvent,
    ) -> Result<Option<Placement>, LocationError> {
        if !self.should_auto_locate(event) {
            return Ok(None);
        }
        self.locate_session(session, terrain).await
    }

    /// The user command: coordinates or a place name.
    pub async fn run_command(&self, session: &dyn Session, terrain: &dyn Terrain, text: &str) -> CommandReply {
        let target = match parse_command(text) {
            Ok(target) => target,
            Err(e) => return CommandReply::error(e.to_string()),
        };
        let request = LookupRequest {
            subject: session.name(),
            target,
        };

        match self.execute(session, terrain, &request).await {
            Ok(Some(placement)) => CommandReply::ok(placement_message(&request.target, &placement)),
            Ok(None) => CommandReply::error("Nothing to look up"),
            Err(e) => {
                warn!(subject = %request.subject, error = %e, "command failed");
                CommandReply::error(e.to_string())
            }
        }
    }

    /// Where on Earth a planar position lies.
    pub fn describe_position(&self, x: f64, z: f64) -> (GeoFix, String) {
        let fix = self.config.projection.to_geo(x, z);
        let label = if projection::is_out_of_bounds(&fix) {
            "beyond the edge of the world map".to_string()
        } else {
            format_coords(fix.lat, fix.lon)
        };
        (fix, label)
    }

    /// Hand a request to the runtime and return immediately.
    pub fn spawn_request(
        self: &Arc<Self>,
        session: Arc<dyn Session>,
        terrain: Arc<dyn Terrain>,
        request: LookupRequest,
    ) -> JoinHandle<Result<Option<Placement>, LocationError>> {
        let resolver = Arc::clone(self);
        tokio::spawn(async move {
            resolver
                .handle_request(session.as_ref(), terrain.as_ref(), request)
                .await
        })
    }

    /// Hand a session event to the runtime and return immediately.
    pub fn spawn_session_event(
        self: &Arc<Self>,
        session: Arc<dyn Session>,
        terrain: Arc<dyn Terrain>,
        event: SessionEvent,
    ) -> JoinHandle<Result<Option<Placement>, LocationError>> {
        let resolver = Arc::clone(self);
        tokio::spawn(async move {
            resolver
                .on_session_event(session.as_ref(), terrain.as_ref(), event)
                .await
        })
    }
}

fn from_cache(mut fix: GeoFix) -> GeoFix {
    fix.source = FixSource::Cache;
    fix
}

fn placement_message(target: &LookupTarget, placement: &Placement) -> String {
    match target {
        LookupTarget::Address(_) => format!(
            "You appear to be in {}. Moving you to {}.",
            placement.label, placement.position
        ),
        _ => format!("Moving you to {} at {}.", placement.label, placement.position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpRequest, HttpResult};
    use crate::location::cache::ManualClock;
    use crate::location::PlanarPosition;
    use crate::session::{FlatTerrain, LocalSession};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers every request with the same result and counts calls.
    struct ScriptedHttp {
        result: HttpResult,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    impl ScriptedHttp {
        fn new(result: HttpResult) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpClient for ScriptedHttp {
        async fn fetch(&self, request: HttpRequest) -> HttpResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(request.url);
            self.result.clone()
        }
    }

    const GOOGLE_DNS: &str = r#"{"status":"success","country":"United States","regionName":"Virginia","city":"Ashburn","lat":39.03,"lon":-77.5,"isp":"Google LLC"}"#;

    fn offline_resolver() -> LocationResolver {
        LocationResolver::new(GeoConfig::default(), None)
    }

    fn online_resolver(http: Arc<ScriptedHttp>) -> LocationResolver {
        LocationResolver::new(GeoConfig::default(), Some(http))
    }

    #[tokio::test]
    async fn test_resolve_builtin_fallback() {
        let fix = offline_resolver().resolve_place("Berlin").await.unwrap();
        assert_eq!(fix.source, FixSource::Fallback);
        assert!((fix.lat - 52.52).abs() < 0.01);
        assert!((fix.lon - 13.405).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_resolve_unknown_place_offline() {
        let result = offline_resolver().resolve_place("Nowhereville").await;
        assert_eq!(result, Err(LocationError::UnknownPlace("Nowhereville".into())));
    }

    #[tokio::test]
    async fn test_resolve_blank_place() {
        let result = offline_resolver().resolve_place(" ?! ").await;
        assert!(matches!(result, Err(LocationError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_private_address_skipped() {
        let http = ScriptedHttp::new(HttpResult::ok(GOOGLE_DNS));
        let resolver = online_resolver(http.clone());
        assert_eq!(resolver.resolve_address("192.168.1.5").await, Ok(None));
        assert_eq!(resolver.resolve_address("[::1]:1234").await, Ok(None));
        assert_eq!(http.calls(), 0);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_address_lookup_then_cache_hit() {
        let http = ScriptedHttp::new(HttpResult::ok(GOOGLE_DNS));
        let resolver = online_resolver(http.clone());

        let fix = resolver.resolve_address("8.8.8.8:30000").await.unwrap().unwrap();
        assert_eq!(fix.source, FixSource::IpApi);
        assert_eq!(fix.label(), "Ashburn, Virginia, United States");

        let again = resolver.resolve_address("8.8.8.8").await.unwrap().unwrap();
        assert_eq!(again.source, FixSource::Cache);
        assert_eq!(again.lat, fix.lat);
        assert_eq!(http.calls(), 1);
        assert!(http.urls.lock().unwrap()[0].starts_with("http://ip-api.com/json/8.8.8.8?"));
    }

    #[tokio::test]
    async fn test_address_without_provider() {
        let result = offline_resolver().resolve_address("8.8.8.8").await;
        assert_eq!(result, Err(LocationError::ProviderUnavailable));
    }

    #[tokio::test]
    async fn test_unparsable_payload_is_cached() {
        let http = ScriptedHttp::new(HttpResult::ok("<html>rate limited</html>"));
        let resolver = online_resolver(http.clone());

        assert!(matches!(resolver.resolve_address("1.1.1.1").await, Err(LocationError::Parse(_))));
        assert!(matches!(resolver.resolve_address("1.1.1.1").await, Err(LocationError::Parse(_))));
        assert_eq!(http.calls(), 1);
    }

    #[tokio::test]
    async fn test_payload_without_coordinates_is_cached() {
        let http = ScriptedHttp::new(HttpResult::ok(r#"{"status":"success"}"#));
        let resolver = online_resolver(http.clone());

        assert!(matches!(resolver.resolve_address("1.1.1.1").await, Err(LocationError::Parse(_))));
        assert!(matches!(resolver.resolve_address("1.1.1.1").await, Err(LocationError::Parse(_))));
        assert_eq!(http.calls(), 1);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_non_ip_address_rejected() {
        let http = ScriptedHttp::new(HttpResult::ok(GOOGLE_DNS));
        let resolver = online_resolver(http.clone());

        for address in ["8.8.8.8?fields=all&x=", "example.com", "1.2.3.4/../admin", "[8.8.8.8#frag]"] {
            assert!(
                matches!(resolver.resolve_address(address).await, Err(LocationError::InvalidInput(_))),
                "{} should be rejected",
                address
            );
        }
        assert_eq!(http.calls(), 0);
        assert!(resolver.cache().is_empty());

        let fix = resolver.resolve_address("[2001:4860:4860::8888]:443").await.unwrap().unwrap();
        assert_eq!(fix.source, FixSource::IpApi);
        assert!(http.urls.lock().unwrap()[0].starts_with("http://ip-api.com/json/2001:4860:4860::8888?"));
    }

    #[tokio::test]
    async fn test_network_failure_not_cached() {
        let http = ScriptedHttp::new(HttpResult::failed("timed out"));
        let resolver = online_resolver(http.clone());

        assert_eq!(
            resolver.resolve_place("Berlin").await,
            Err(LocationError::Network("timed out".into()))
        );
        assert!(resolver.resolve_place("Berlin").await.is_err());
        assert_eq!(http.calls(), 2);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_geocode_uses_provider_not_builtin() {
        let http = ScriptedHttp::new(HttpResult::ok(
            r#"[{"lat":"52.5170365","lon":"13.3888599","display_name":"Berlin, Deutschland"}]"#,
        ));
        let resolver = online_resolver(http.clone());

        let fix = resolver.resolve_place("Berlin").await.unwrap();
        assert_eq!(fix.source, FixSource::Geocoder);
        assert_eq!(fix.label(), "Berlin, Deutschland");

        let cached = resolver.resolve_place("  BERLIN ").await.unwrap();
        assert_eq!(cached.source, FixSource::Cache);
        assert_eq!(http.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_expiry_refetches() {
        let http = ScriptedHttp::new(HttpResult::ok(GOOGLE_DNS));
        let clock = Arc::new(ManualClock::new(0));
        let cache = Arc::new(ResolutionCache::with_clock(Duration::from_secs(60), clock.clone()));
        let resolver = LocationResolver::with_cache(GeoConfig::default(), Some(http.clone()), cache);

        resolver.resolve_address("8.8.8.8").await.unwrap();
        clock.advance(Duration::from_secs(30));
        resolver.resolve_address("8.8.8.8").await.unwrap();
        assert_eq!(http.calls(), 1);

        clock.advance(Duration::from_secs(31));
        resolver.resolve_address("8.8.8.8").await.unwrap();
        assert_eq!(http.calls(), 2);
    }

    #[tokio::test]
    async fn test_handle_request_moves_and_notifies() {
        let resolver = offline_resolver();
        let session = LocalSession::new("alice", None);
        let terrain = FlatTerrain { height: 7.0 };

        let request = LookupRequest {
            subject: "alice".into(),
            target: LookupTarget::Place("Berlin".into()),
        };
        let placement = resolver.handle_request(&session, &terrain, request).await.unwrap().unwrap();

        assert_eq!(placement.position.y, 7.0);
        assert_eq!(session.position(), Some(placement.position));
        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Berlin, Germany"));
    }

    #[tokio::test]
    async fn test_capability_veto() {
        let resolver = offline_resolver();
        let session = LocalSession::new("old-client", None).with_max_coordinate(31000.0);
        let request = LookupRequest {
            subject: "old-client".into(),
            target: LookupTarget::Place("Tokyo".into()),
        };

        let result = resolver.handle_request(&session, &FlatTerrain::default(), request).await;
        assert!(matches!(result, Err(LocationError::CapabilityVeto(_))));
        assert_eq!(session.position(), None);
        assert!(session.messages()[0].starts_with("Location lookup failed"));
    }

    #[tokio::test]
    async fn test_locate_session_without_address_is_silent() {
        let resolver = offline_resolver();
        let session = LocalSession::new("ghost", None);
        let result = resolver.locate_session(&session, &FlatTerrain::default()).await;
        assert_eq!(result.unwrap().map(|p| p.label), None);
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_locate_session_private_is_silent() {
        let http = ScriptedHttp::new(HttpResult::ok(GOOGLE_DNS));
        let resolver = online_resolver(http.clone());
        let session = LocalSession::new("lan", Some("10.0.0.5:30000"));

        let result = resolver.locate_session(&session, &FlatTerrain::default()).await;
        assert!(result.unwrap().is_none());
        assert!(session.messages().is_empty());
        assert_eq!(session.position(), None);
        assert_eq!(http.calls(), 0);
    }

    #[tokio::test]
    async fn test_locate_session_public() {
        let http = ScriptedHttp::new(HttpResult::ok(GOOGLE_DNS));
        let resolver = online_resolver(http);
        let session = LocalSession::new("bob", Some("8.8.8.8:30000"));

        let placement = resolver
            .locate_session(&session, &FlatTerrain::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.position(), Some(placement.position));
        assert!(session.messages()[0].starts_with("You appear to be in Ashburn"));
    }

    #[test]
    fn test_should_auto_locate() {
        let plain = offline_resolver();
        assert!(!plain.should_auto_locate(SessionEvent::Join));
        assert!(!plain.should_auto_locate(SessionEvent::Respawn));

        let spawn = LocationResolver::new(GeoConfig { auto_on_spawn: true, ..GeoConfig::default() }, None);
        assert!(spawn.should_auto_locate(SessionEvent::NewPlayer));
        assert!(spawn.should_auto_locate(SessionEvent::Respawn));
        assert!(!spawn.should_auto_locate(SessionEvent::Join));

        let mut centered = GeoConfig { auto_on_spawn: true, ..GeoConfig::default() };
        centered.projection.reference_center = Some(PlanarPosition::new(0.0, 10.0, 0.0));
        let centered = LocationResolver::new(centered, None);
        assert!(centered.should_auto_locate(SessionEvent::Join));
        assert!(!centered.should_auto_locate(SessionEvent::Respawn));

        let disabled = LocationResolver::new(
            GeoConfig { enable: false, auto_on_spawn: true, ..GeoConfig::default() },
            None,
        );
        assert!(!disabled.should_auto_locate(SessionEvent::NewPlayer));
    }

    #[tokio::test]
    async fn test_run_command() {
        let resolver = offline_resolver();
        let session = LocalSession::new("carol", None);
        let terrain = FlatTerrain::default();

        let reply = resolver.run_command(&session, &terrain, "0, 0").await;
        assert!(reply.success, "{}", reply.message);
        assert_eq!(session.position(), Some(PlanarPosition::new(0.0, 0.0, 0.0)));

        let reply = resolver.run_command(&session, &terrain, "Nowhereville").await;
        assert!(!reply.success);
        assert!(reply.message.contains("Nowhereville"));

        let reply = resolver.run_command(&session, &terrain, "95 10").await;
        assert!(!reply.success);
        assert!(session.messages().is_empty(), "commands reply instead of notifying");
    }

    #[test]
    fn test_describe_position() {
        let resolver = offline_resolver();
        let (fix, label) = resolver.describe_position(0.0, 0.0);
        assert_eq!((fix.lat, fix.lon), (0.0, 0.0));
        assert_eq!(label, format_coords(0.0, 0.0));

        let (fix, label) = resolver.describe_position(0.0, 1e8);
        assert_eq!(fix.lat, projection::OUT_OF_BOUNDS_LAT);
        assert_eq!(label, "beyond the edge of the world map");
    }

    #[tokio::test]
    async fn test_describe_position_with_world_center() {
        let mut config = GeoConfig::default();
        config.projection.reference_center = Some(PlanarPosition::new(13.405, 64.0, 52.52));
        config.projection.integer_blocks = false;
        let resolver = LocationResolver::new(config, None);
        let terrain = FlatTerrain { height: 0.0 };

        let paris = resolver.place(GeoFix::new(48.8566, 2.3522, FixSource::Manual), &terrain);
        let (fix, label) = resolver.describe_position(paris.position.x, paris.position.z);
        assert!((fix.lat - 48.8566).abs() < 1e-9);
        assert!((fix.lon - 2.3522).abs() < 1e-9);
        assert_eq!(label, format_coords(fix.lat, fix.lon));

        let (origin, _) = resolver.describe_position(0.0, 0.0);
        assert!((origin.lat - 52.52).abs() < 1e-9);
        assert!((origin.lon - 13.405).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_world_center_vertical_offset() {
        let mut config = GeoConfig::default();
        config.projection.reference_center = Some(PlanarPosition::new(0.0, 40.0, 0.0));
        let resolver = LocationResolver::new(config, None);
        let fix = resolver.resolve_place("Berlin").await.unwrap();
        let placement = resolver.place(fix, &FlatTerrain { height: 2.0 });
        assert_eq!(placement.position.y, 42.0);
    }

    #[tokio::test]
    async fn test_spawn_request() {
        let resolver = Arc::new(offline_resolver());
        let session = Arc::new(LocalSession::new("dave", None));
        let handle = resolver.spawn_request(
            session.clone(),
            Arc::new(FlatTerrain::default()),
            LookupRequest {
                subject: "dave".into(),
                target: LookupTarget::Place("Sydney".into()),
            },
        );
        let placement = handle.await.unwrap().unwrap().unwrap();
        assert!(placement.position.z < 0.0);
        assert_eq!(session.position(), Some(placement.position));
    }
}
