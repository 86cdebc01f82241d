use crate::annual_flow::AnnualFlow;
use crate::cumulative_stock::CumulativeStock;
use crate::AccountingPolicy;
use configuration::EngineSettings;
use core_types::PolicyKind;

/// Creates the accounting policy selected by the engine settings.
///
/// The match is exhaustive, so adding a `PolicyKind` without handling it here
/// fails to compile.
pub fn create_policy(settings: &EngineSettings) -> Box<dyn AccountingPolicy> {
    match settings.policy {
        PolicyKind::AnnualFlow => {
            tracing::debug!(basis = ?settings.pending_basis, "Using the annual-flow policy.");
            Box::new(AnnualFlow::new(settings.pending_basis))
        }
        PolicyKind::CumulativeStock => {
            tracing::debug!(window_start = %settings.window_start, "Using the cumulative-stock policy.");
            Box::new(CumulativeStock::new(settings.window_start))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::PendingBasis;

    #[test]
    fn builds_the_configured_policy() {
        let mut settings = EngineSettings::default();
        assert_eq!(create_policy(&settings).kind(), PolicyKind::AnnualFlow);

        settings.policy = PolicyKind::CumulativeStock;
        settings.pending_basis = PendingBasis::Backlog;
        assert_eq!(create_policy(&settings).kind(), PolicyKind::CumulativeStock);
    }
}
