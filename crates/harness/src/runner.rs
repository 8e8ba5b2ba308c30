use tracing::info;

use crate::api_client::OpenAICompatibleClient;
use crate::harness::probe::{Probe, ProbeResult};
use crate::harness_core::transport::HttpTransport;

/// Aggregate result of one full harness run.
#[derive(Debug)]
pub struct SuiteOutcome {
    /// Per-probe results in execution order.
    pub results: Vec<ProbeResult>,
    pub passed_count: usize,
    pub failed_count: usize,
}

impl SuiteOutcome {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count == 0
    }
}

/// Run every declared probe in order under a uniform failure boundary.
///
/// A probe's error is converted into a failed [`ProbeResult`] and the run
/// moves on; no probe can skip or abort the ones after it.
pub async fn run_suite<T: HttpTransport>(
    client: &OpenAICompatibleClient<T>,
    probes: &[Box<dyn Probe<T>>],
) -> SuiteOutcome {
    let mut results = Vec::with_capacity(probes.len());
    for probe in probes {
        info!(probe = probe.name(), "probe starting");
        let result = match probe.run(client).await {
            Ok(result) => result,
            Err(err) => ProbeResult::fail(probe.name(), err.to_string()),
        };
        info!(
            probe = probe.name(),
            passed = result.passed,
            "probe finished"
        );
        results.push(result);
    }

    let passed_count = results.iter().filter(|r| r.passed).count();
    let failed_count = results.len() - passed_count;
    SuiteOutcome {
        results,
        passed_count,
        failed_count,
    }
}
