//! JSON messages exchanged with the remote aggregation service.

use crate::model::ViewRole;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "action")]
pub enum OutboundMessage {
    /// A committed lasso, as a per-point mask aligned to the source view.
    #[serde(rename = "addSelection")]
    AddSelection {
        #[serde(rename = "dataKey")]
        data_key: String,
        #[serde(rename = "sourceViewId")]
        source_view_id: ViewRole,
        #[serde(rename = "targetViewIds")]
        target_view_ids: Vec<ViewRole>,
        #[serde(rename = "selectedMask")]
        selected_mask: Vec<bool>,
    },
    /// Per-group value distribution of one column of a view's data.
    #[serde(rename = "requestHistogram")]
    RequestHistogram {
        #[serde(rename = "dataKey")]
        data_key: String,
        #[serde(rename = "viewId")]
        view_id: ViewRole,
        #[serde(rename = "groupRows")]
        group_rows: Vec<Vec<u32>>,
        #[serde(rename = "selectedColumn")]
        selected_column: u32,
        pos: [f32; 2],
    },
}

impl OutboundMessage {
    pub fn action(&self) -> &'static str {
        match self {
            OutboundMessage::AddSelection { .. } => "addSelection",
            OutboundMessage::RequestHistogram { .. } => "requestHistogram",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Reply kinds the engine forwards to the chart collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SummaryKind {
    SelectionSummary,
    HistogramSummary,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action")]
pub enum InboundMessage {
    #[serde(rename = "selectionSummary")]
    SelectionSummary { content: Value },
    #[serde(rename = "histogramSummary")]
    HistogramSummary { content: Value },
}

impl InboundMessage {
    /// Parse a raw reply. Unknown actions and malformed JSON yield `None`.
    pub fn parse(raw: &str) -> Option<InboundMessage> {
        match serde_json::from_str::<InboundMessage>(raw) {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!("ignoring inbound message: {}", e);
                None
            }
        }
    }

    pub fn into_parts(self) -> (SummaryKind, Value) {
        match self {
            InboundMessage::SelectionSummary { content } => (SummaryKind::SelectionSummary, content),
            InboundMessage::HistogramSummary { content } => (SummaryKind::HistogramSummary, content),
        }
    }
}

/// Indices of the points in each group, for groups `0..group_count`.
pub fn group_rows(groups: &[u32], group_count: u32) -> Vec<Vec<u32>> {
    let mut rows = vec![Vec::new(); group_count as usize];
    for (i, &g) in groups.iter().enumerate() {
        if let Some(r) = rows.get_mut(g as usize) {
            r.push(i as u32);
        }
    }
    rows
}
