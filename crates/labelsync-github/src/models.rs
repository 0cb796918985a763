use labelsync_core::model::RemoteLabel;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct LabelItem {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) color: String,
}

impl From<LabelItem> for RemoteLabel {
    fn from(item: LabelItem) -> Self {
        RemoteLabel {
            name: item.name,
            description: item.description.unwrap_or_default(),
            color: item.color,
        }
    }
}
