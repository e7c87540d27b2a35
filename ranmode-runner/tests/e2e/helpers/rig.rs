//! Loopback rig: a shared call journal plus both service doubles and
//! the diagnostics double, ready to hand to an orchestrator.

use ranmode_core::params::SessionParameters;
use ranmode_runner::loopback::{CallJournal, LoopbackDiagnostics, LoopbackService};
use ranmode_runner::orchestrator::Orchestrator;
use ranmode_runner::report::SessionReport;

/// Scripted doubles sharing one journal.
#[allow(dead_code)]
pub struct Rig {
    pub journal: CallJournal,
    pub core: LoopbackService,
    pub edge: LoopbackService,
    pub diagnostics: LoopbackDiagnostics,
}

#[allow(dead_code)]
impl Rig {
    /// Cooperative doubles: clean starts, clean stops, clean diagnostics.
    pub fn new() -> Self {
        let journal = CallJournal::new();
        Self {
            core: LoopbackService::core_network(journal.clone()),
            edge: LoopbackService::base_station(journal.clone()),
            diagnostics: LoopbackDiagnostics::new(journal.clone()),
            journal,
        }
    }

    pub fn core(mut self, f: impl FnOnce(LoopbackService) -> LoopbackService) -> Self {
        self.core = f(self.core);
        self
    }

    pub fn edge(mut self, f: impl FnOnce(LoopbackService) -> LoopbackService) -> Self {
        self.edge = f(self.edge);
        self
    }

    pub fn diagnostics(
        mut self,
        f: impl FnOnce(LoopbackDiagnostics) -> LoopbackDiagnostics,
    ) -> Self {
        self.diagnostics = f(self.diagnostics);
        self
    }

    /// Execute one run and return the report with the journal for inspection.
    pub async fn run(self, params: SessionParameters) -> (SessionReport, CallJournal) {
        let orchestrator = Orchestrator::new(params, self.core, self.edge, self.diagnostics);
        let report = orchestrator.execute().await;
        (report, self.journal)
    }
}
