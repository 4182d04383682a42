use std::sync::Arc;

#[derive(Clone)]
pub struct ApiState {
    pub loader: Arc<chainsight_loader::DashboardLoader>,
    pub warehouse: Arc<dyn chainsight_core::Warehouse>,
    pub narrative: Option<Arc<dyn chainsight_narrative::NarrativeService>>,
}
