use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use graymesh_model::{Instance, InstanceStatus, ServiceId};

use crate::{Registration, RegistryBackend, RegistryConfig, ServiceCache};

/// Failure-tolerant wrapper around a [`RegistryBackend`].
///
/// Every registry-facing error is swallowed at this boundary and turned
/// into a cache or default result. Registration operations are
/// fire-and-forget; discovery operations refresh the injected
/// [`ServiceCache`] on success and, when failure tolerance is enabled,
/// fall back to it on error. No method of this type ever returns `Err`.
pub struct RegistryClient {
    backend: Arc<dyn RegistryBackend>,
    cache: ServiceCache,
    config: RegistryConfig,
}

impl RegistryClient {
    /// Wrap `backend` with the given cache and configuration.
    pub fn new(backend: Arc<dyn RegistryBackend>, cache: ServiceCache, config: RegistryConfig) -> Self {
        Self {
            backend,
            cache,
            config,
        }
    }

    /// The injected cache, shared with whoever created it.
    pub fn cache(&self) -> &ServiceCache {
        &self.cache
    }

    fn registration(&self) -> Option<Registration> {
        Registration::from_config(&self.config)
    }

    /// Register this instance. Idempotent, fire-and-forget.
    ///
    /// With no configured service identity this is a logged no-op; a
    /// transport error is logged and swallowed.
    #[instrument(level = "debug", skip(self), fields(backend = self.backend.name()))]
    pub async fn register(&self) {
        let Some(reg) = self.registration() else {
            warn!("register skipped: no service identity configured");
            return;
        };
        match self.backend.register(&self.config.group, &reg).await {
            Ok(()) => debug!(service = %reg.service_id, endpoint = %reg.endpoint(), "registered"),
            Err(e) => error!(service = %reg.service_id, error = %e, "register failed"),
        }
    }

    /// Deregister this instance. Idempotent, fire-and-forget.
    #[instrument(level = "debug", skip(self), fields(backend = self.backend.name()))]
    pub async fn deregister(&self) {
        let Some(reg) = self.registration() else {
            warn!("deregister skipped: no service identity configured");
            return;
        };
        match self.backend.deregister(&self.config.group, &reg).await {
            Ok(()) => debug!(service = %reg.service_id, "deregistered"),
            Err(e) => error!(service = %reg.service_id, error = %e, "deregister failed"),
        }
    }

    /// Instances of `service_id`, fresh when the registry answers.
    ///
    /// Success overwrites the cache unconditionally, even with an empty
    /// list. On failure the cached snapshot is served if failure
    /// tolerance is enabled (possibly stale, possibly empty if never
    /// populated), otherwise an empty list.
    #[instrument(level = "debug", skip(self), fields(backend = self.backend.name()))]
    pub async fn get_instances(&self, service_id: &str) -> Vec<Instance> {
        match self
            .backend
            .query_instances(&self.config.group, service_id)
            .await
        {
            Ok(fresh) => {
                self.cache.put_instances(service_id, fresh.clone());
                fresh
            }
            Err(e) => {
                error!(service = service_id, error = %e, "instance query failed");
                if self.config.failure_tolerance {
                    self.cache.instances(service_id)
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Known service ids, same fallback pattern as [`Self::get_instances`].
    #[instrument(level = "debug", skip(self), fields(backend = self.backend.name()))]
    pub async fn get_services(&self) -> Vec<ServiceId> {
        match self.backend.query_services(&self.config.group).await {
            Ok(fresh) => {
                self.cache.put_services(fresh.clone());
                fresh
            }
            Err(e) => {
                error!(error = %e, "service query failed");
                if self.config.failure_tolerance {
                    self.cache.services()
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Push a liveness status (`UP`/`DOWN`, case-insensitive) for this
    /// instance.
    ///
    /// Any other value is rejected before the wire: logged, no remote
    /// call, no partial update. A transport error is logged and
    /// swallowed; no local state changes either way.
    #[instrument(level = "debug", skip(self), fields(backend = self.backend.name()))]
    pub async fn update_instance_status(&self, status: &str) {
        let status = match status.parse::<InstanceStatus>() {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "status update rejected");
                return;
            }
        };
        let Some(reg) = self.registration() else {
            warn!("status update skipped: no service identity configured");
            return;
        };
        match self
            .backend
            .update_status(&self.config.group, &reg, status)
            .await
        {
            Ok(()) => debug!(service = %reg.service_id, status = %status, "status updated"),
            Err(e) => error!(service = %reg.service_id, error = %e, "status update failed"),
        }
    }

    /// Liveness of this instance as the registry currently sees it.
    ///
    /// Scans a fresh instance list for our own address and port:
    /// `Up`/`Down` from the matched instance's enabled flag, `Unknown`
    /// when absent or when the registry is unreachable (failure tolerance
    /// does not apply to liveness).
    #[instrument(level = "debug", skip(self), fields(backend = self.backend.name()))]
    pub async fn get_instance_status(&self) -> InstanceStatus {
        let Some(reg) = self.registration() else {
            warn!("status query skipped: no service identity configured");
            return InstanceStatus::Unknown;
        };
        match self
            .backend
            .query_instances(&self.config.group, &reg.service_id)
            .await
        {
            Ok(fresh) => {
                self.cache.put_instances(reg.service_id.clone(), fresh.clone());
                match fresh
                    .iter()
                    .find(|i| i.address == reg.address && i.port == reg.port)
                {
                    Some(own) if own.enabled => InstanceStatus::Up,
                    Some(_) => InstanceStatus::Down,
                    None => InstanceStatus::Unknown,
                }
            }
            Err(e) => {
                error!(service = %reg.service_id, error = %e, "status query failed");
                InstanceStatus::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use graymesh_model::{Instance, InstanceStatus, ServiceId};

    use super::RegistryClient;
    use crate::{
        Registration, RegistryBackend, RegistryConfig, RegistryError, RegistryResult, ServiceCache,
    };

    /// Backend that replays a scripted sequence of query results and
    /// records every remote call it receives.
    #[derive(Default)]
    struct ScriptedBackend {
        instance_replies: Mutex<VecDeque<RegistryResult<Vec<Instance>>>>,
        service_replies: Mutex<VecDeque<RegistryResult<Vec<ServiceId>>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn push_instances(&self, reply: RegistryResult<Vec<Instance>>) {
            self.instance_replies.lock().unwrap().push_back(reply);
        }

        fn push_services(&self, reply: RegistryResult<Vec<ServiceId>>) {
            self.service_replies.lock().unwrap().push_back(reply);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }
    }

    #[async_trait]
    impl RegistryBackend for ScriptedBackend {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn register(&self, _group: &str, reg: &Registration) -> RegistryResult<()> {
            self.record(format!("register {}", reg.service_id));
            Ok(())
        }

        async fn deregister(&self, _group: &str, reg: &Registration) -> RegistryResult<()> {
            self.record(format!("deregister {}", reg.service_id));
            Ok(())
        }

        async fn query_instances(
            &self,
            _group: &str,
            service_id: &str,
        ) -> RegistryResult<Vec<Instance>> {
            self.record(format!("query_instances {service_id}"));
            self.instance_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(RegistryError::RemoteUnavailable("unscripted".into())))
        }

        async fn query_services(&self, _group: &str) -> RegistryResult<Vec<ServiceId>> {
            self.record("query_services".to_string());
            self.service_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(RegistryError::RemoteUnavailable("unscripted".into())))
        }

        async fn update_status(
            &self,
            _group: &str,
            reg: &Registration,
            status: InstanceStatus,
        ) -> RegistryResult<()> {
            self.record(format!("update_status {} {}", reg.service_id, status));
            Ok(())
        }
    }

    fn inst(addr: &str, version: &str) -> Instance {
        Instance::new("orders", addr, 8080).with_version(version)
    }

    fn client_with(
        backend: Arc<ScriptedBackend>,
        failure_tolerance: bool,
    ) -> (RegistryClient, ServiceCache) {
        let cache = ServiceCache::new();
        let config = RegistryConfig {
            service_id: "orders".to_string(),
            address: "10.0.0.1".to_string(),
            port: 8080,
            failure_tolerance,
            ..RegistryConfig::default()
        };
        (
            RegistryClient::new(backend, cache.clone(), config),
            cache,
        )
    }

    #[tokio::test]
    async fn tolerance_serves_cached_snapshot_on_failure() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_instances(Ok(vec![inst("10.0.0.1", "v1"), inst("10.0.0.2", "v2")]));
        backend.push_instances(Err(RegistryError::RemoteUnavailable("down".into())));

        let (client, _cache) = client_with(backend, true);

        let fresh = client.get_instances("orders").await;
        assert_eq!(fresh.len(), 2);

        let fallback = client.get_instances("orders").await;
        assert_eq!(fallback, fresh);
    }

    #[tokio::test]
    async fn without_tolerance_failure_yields_empty_list() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_instances(Ok(vec![inst("10.0.0.1", "v1")]));
        backend.push_instances(Err(RegistryError::RemoteUnavailable("down".into())));

        let (client, cache) = client_with(backend, false);

        assert_eq!(client.get_instances("orders").await.len(), 1);
        assert!(client.get_instances("orders").await.is_empty());

        // the good snapshot itself is untouched by the failing refresh
        assert_eq!(cache.instances("orders").len(), 1);
    }

    #[tokio::test]
    async fn successful_empty_reply_overwrites_cache() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_instances(Ok(vec![inst("10.0.0.1", "v1")]));
        backend.push_instances(Ok(Vec::new()));
        backend.push_instances(Err(RegistryError::RemoteUnavailable("down".into())));

        let (client, _cache) = client_with(backend, true);

        assert_eq!(client.get_instances("orders").await.len(), 1);
        assert!(client.get_instances("orders").await.is_empty());

        // fallback now reflects the genuinely empty registry
        assert!(client.get_instances("orders").await.is_empty());
    }

    #[tokio::test]
    async fn services_follow_the_same_fallback_pattern() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_services(Ok(vec!["billing".to_string(), "orders".to_string()]));
        backend.push_services(Err(RegistryError::RemoteUnavailable("down".into())));

        let (client, _cache) = client_with(backend.clone(), true);

        assert_eq!(client.get_services().await, ["billing", "orders"]);
        assert_eq!(client.get_services().await, ["billing", "orders"]);

        let (strict, _cache) = client_with(backend, false);
        assert!(strict.get_services().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_status_never_reaches_the_backend() {
        let backend = Arc::new(ScriptedBackend::default());
        let (client, _cache) = client_with(backend.clone(), false);

        client.update_instance_status("maybe").await;
        client.update_instance_status("").await;

        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn valid_status_is_pushed_case_insensitively() {
        let backend = Arc::new(ScriptedBackend::default());
        let (client, _cache) = client_with(backend.clone(), false);

        client.update_instance_status("down").await;
        client.update_instance_status("Up").await;

        assert_eq!(
            backend.calls(),
            ["update_status orders DOWN", "update_status orders UP"]
        );
    }

    #[tokio::test]
    async fn register_without_identity_is_a_local_no_op() {
        let backend = Arc::new(ScriptedBackend::default());
        let cache = ServiceCache::new();
        let client = RegistryClient::new(backend.clone(), cache, RegistryConfig::default());

        client.register().await;
        client.deregister().await;
        client.update_instance_status("up").await;

        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn register_and_deregister_reach_the_backend() {
        let backend = Arc::new(ScriptedBackend::default());
        let (client, _cache) = client_with(backend.clone(), false);

        client.register().await;
        client.deregister().await;

        assert_eq!(backend.calls(), ["register orders", "deregister orders"]);
    }

    #[tokio::test]
    async fn own_status_is_derived_from_the_fresh_list() {
        let backend = Arc::new(ScriptedBackend::default());
        let enabled = inst("10.0.0.1", "v1");
        let mut disabled = inst("10.0.0.1", "v1");
        disabled.enabled = false;

        backend.push_instances(Ok(vec![enabled]));
        backend.push_instances(Ok(vec![disabled]));
        backend.push_instances(Ok(vec![inst("10.0.0.9", "v1")]));
        backend.push_instances(Err(RegistryError::RemoteUnavailable("down".into())));

        let (client, _cache) = client_with(backend, true);

        assert_eq!(client.get_instance_status().await, InstanceStatus::Up);
        assert_eq!(client.get_instance_status().await, InstanceStatus::Down);
        assert_eq!(client.get_instance_status().await, InstanceStatus::Unknown);
        // unreachable registry is Unknown even with tolerance enabled
        assert_eq!(client.get_instance_status().await, InstanceStatus::Unknown);
    }

    #[tokio::test]
    async fn concurrent_callers_share_the_client_safely() {
        let backend = Arc::new(ScriptedBackend::default());
        for _ in 0..8 {
            backend.push_instances(Ok(vec![inst("10.0.0.1", "v1")]));
        }

        let (client, _cache) = client_with(backend, true);
        let client = Arc::new(client);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let client = Arc::clone(&client);
                tokio::spawn(async move { client.get_instances("orders").await })
            })
            .collect();

        for t in tasks {
            assert_eq!(t.await.unwrap().len(), 1);
        }
    }
}
