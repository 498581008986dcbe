//! Race coordinator.
//!
//! # Responsibilities
//! - Spawn one detached lookup task per provider
//! - Wait once on the fan-in of all completions and the deadline
//! - Turn the first arrival into the race's single [`LookupOutcome`]
//!
//! # Design Decisions
//! - Each task hands its result over its own oneshot channel
//! - Losing tasks are abandoned, not aborted; their HTTP timeout bounds them
//! - No preference between providers, only arrival order

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::{select_all, BoxFuture, FutureExt};
use tokio::sync::oneshot;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::RaceConfig;
use crate::observability::metrics;
use crate::provider::{HttpProvider, LookupError, LookupProvider, LookupQuery, LookupRecord};
use crate::race::outcome::{LookupOutcome, RaceStrategy};

/// Completion of one provider: its name and what it produced.
type Completion = BoxFuture<'static, (String, Result<LookupRecord, LookupError>)>;

/// Race `providers` for `query` with the default first-completed strategy.
pub async fn race(
    query: &LookupQuery,
    providers: &[Arc<dyn LookupProvider>],
    timeout: Duration,
) -> LookupOutcome {
    RaceCoordinator::new(providers.to_vec(), timeout)
        .race(query)
        .await
}

/// Runs a set of providers against each other under a shared deadline.
#[derive(Clone)]
pub struct RaceCoordinator {
    providers: Vec<Arc<dyn LookupProvider>>,
    timeout: Duration,
    strategy: RaceStrategy,
}

impl RaceCoordinator {
    pub fn new(providers: Vec<Arc<dyn LookupProvider>>, timeout: Duration) -> Self {
        Self {
            providers,
            timeout,
            strategy: RaceStrategy::default(),
        }
    }

    /// Build HTTP providers for every configured backend, sharing one client.
    pub fn from_config(config: &RaceConfig) -> Self {
        Self::from_config_with_client(config, reqwest::Client::new())
    }

    /// Same as [`RaceCoordinator::from_config`] over a caller-supplied client.
    pub fn from_config_with_client(config: &RaceConfig, client: reqwest::Client) -> Self {
        let providers = config
            .providers
            .iter()
            .map(|p| Arc::new(HttpProvider::with_client(p, client.clone())) as Arc<dyn LookupProvider>)
            .collect();

        Self::new(providers, config.timeout()).with_strategy(config.strategy)
    }

    pub fn with_strategy(mut self, strategy: RaceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn strategy(&self) -> RaceStrategy {
        self.strategy
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Run one race. Never fails; every terminal condition is an outcome.
    pub async fn race(&self, query: &LookupQuery) -> LookupOutcome {
        let race_id = Uuid::new_v4();
        let span = tracing::info_span!("race", %race_id, query = %query);

        async {
            let started = Instant::now();
            tracing::info!(
                providers = ?self.provider_names(),
                timeout_ms = self.timeout.as_millis() as u64,
                strategy = ?self.strategy,
                "Race started"
            );

            let outcome = self.run(query).await;

            tracing::info!(
                outcome = outcome.kind(),
                provider = outcome.provider().unwrap_or("-"),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Race finished"
            );
            metrics::record_outcome(&outcome);
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(&self, query: &LookupQuery) -> LookupOutcome {
        let deadline = tokio::time::Instant::now() + self.timeout;
        let timed_out = LookupOutcome::Timeout {
            after: self.timeout,
        };

        // All tasks are spawned before the first wait.
        let mut pending: Vec<Completion> = self
            .providers
            .iter()
            .map(|provider| spawn_lookup(Arc::clone(provider), query.clone(), self.timeout))
            .collect();

        let sleep = tokio::time::sleep_until(deadline);
        tokio::pin!(sleep);

        let mut first_failure: Option<LookupError> = None;

        loop {
            if pending.is_empty() {
                // Nothing left that could complete.
                if let Some(error) = first_failure {
                    return LookupOutcome::Failure(error);
                }
                sleep.as_mut().await;
                return timed_out;
            }

            tokio::select! {
                ((name, result), _, rest) = select_all(pending) => match result {
                    Ok(record) => {
                        tracing::debug!(provider = %name, "First completion is a success");
                        return LookupOutcome::Success(record);
                    }
                    Err(error) => match self.strategy {
                        RaceStrategy::FirstCompleted => {
                            tracing::debug!(provider = %name, error = %error, "First completion is a failure");
                            return LookupOutcome::Failure(error);
                        }
                        RaceStrategy::FirstSuccess => {
                            tracing::debug!(
                                provider = %name,
                                error = %error,
                                remaining = rest.len(),
                                "Provider failed, waiting on the rest"
                            );
                            first_failure.get_or_insert(error);
                            pending = rest;
                        }
                    },
                },
                _ = sleep.as_mut() => {
                    tracing::debug!("Deadline reached before any usable completion");
                    return timed_out;
                }
            }
        }
    }
}

impl std::fmt::Debug for RaceCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceCoordinator")
            .field("providers", &self.provider_names())
            .field("timeout", &self.timeout)
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// Start a detached lookup and return the receiving half of its hand-off.
fn spawn_lookup(
    provider: Arc<dyn LookupProvider>,
    query: LookupQuery,
    deadline: Duration,
) -> Completion {
    let name = provider.name().to_string();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(
        async move {
            let result = provider.lookup(&query, deadline).await;
            // The receiver is gone once the race has been decided.
            let _ = tx.send(result);
        }
        .in_current_span(),
    );

    async move {
        let result = match rx.await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Aborted {
                provider: name.clone(),
            }),
        };
        (name, result)
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_providers_waits_for_deadline() {
        let query = LookupQuery::parse("01001-000").unwrap();
        let started = Instant::now();
        let outcome = race(&query, &[], Duration::from_millis(50)).await;

        assert!(matches!(outcome, LookupOutcome::Timeout { after } if after == Duration::from_millis(50)));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_from_config_builds_one_provider_per_entry() {
        let coordinator = RaceCoordinator::from_config(&RaceConfig::default());
        assert_eq!(coordinator.provider_names(), vec!["ViaCEP", "ApiCEP"]);
        assert_eq!(coordinator.timeout(), Duration::from_millis(1000));
        assert_eq!(coordinator.strategy(), RaceStrategy::FirstCompleted);
    }

    #[tokio::test]
    async fn test_from_config_with_client_keeps_strategy() {
        let config = RaceConfig {
            strategy: RaceStrategy::FirstSuccess,
            ..RaceConfig::default()
        };
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let coordinator = RaceCoordinator::from_config_with_client(&config, client);

        assert_eq!(coordinator.provider_names(), vec!["ViaCEP", "ApiCEP"]);
        assert_eq!(coordinator.strategy(), RaceStrategy::FirstSuccess);
    }
}
