use crate::interop::{arr_u32, new_obj, set_kv};
use embview::{AggregationCollaborator, ChartCollaborator, OutboundMessage, SummaryKind, ViewData};
use js_sys::Function;
use serde_json::Value;
use wasm_bindgen::JsValue;

/// Chart collaborator backed by host callbacks.
///
/// `chart(data, groupCount)` gets `{ view, viewId, groups }` with groups as a
/// `Uint32Array`; `summary(kind, content)` gets replies from the aggregation
/// service unchanged.
pub struct JsChart {
    pub chart: Function,
    pub summary: Option<Function>,
}

impl ChartCollaborator for JsChart {
    fn chart(&mut self, data: &ViewData<'_>, group_count: u32) {
        let obj = new_obj();
        set_kv(&obj, "view", &JsValue::from_f64(data.id.0 as f64));
        set_kv(&obj, "viewId", &JsValue::from_str(data.role.code()));
        set_kv(&obj, "groups", &arr_u32(data.groups).into());
        if let Err(e) = self
            .chart
            .call2(&JsValue::NULL, &obj.into(), &JsValue::from_f64(group_count as f64))
        {
            log::warn!("chart callback threw: {:?}", e);
        }
    }

    fn summary(&mut self, kind: SummaryKind, content: &Value) {
        let Some(cb) = &self.summary else { return };
        let kind = match kind {
            SummaryKind::SelectionSummary => "selectionSummary",
            SummaryKind::HistogramSummary => "histogramSummary",
        };
        let content = match serde_wasm_bindgen::to_value(content) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("summary content not convertible: {}", e);
                return;
            }
        };
        if let Err(e) = cb.call2(&JsValue::NULL, &JsValue::from_str(kind), &content) {
            log::warn!("summary callback threw: {:?}", e);
        }
    }
}

/// Aggregation transport: hands the serialized JSON to a host `send(text)`,
/// typically a websocket's.
pub struct JsTransport {
    pub send: Function,
}

impl AggregationCollaborator for JsTransport {
    fn send(&mut self, msg: &OutboundMessage) {
        match msg.to_json() {
            Ok(text) => {
                if let Err(e) = self.send.call1(&JsValue::NULL, &JsValue::from_str(&text)) {
                    log::warn!("send callback threw: {:?}", e);
                }
            }
            Err(e) => log::warn!("{} not serializable: {}", msg.action(), e),
        }
    }
}
