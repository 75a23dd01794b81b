//! Save/cancel callbacks supplied by the host page.

use cb_core::AnimationDocument;
use cb_editor::SaveSink;
use wasm_bindgen::JsValue;

pub(crate) struct JsSink {
    save: js_sys::Function,
    cancel: js_sys::Function,
}

impl JsSink {
    pub(crate) fn new(save: js_sys::Function, cancel: js_sys::Function) -> Self {
        Self { save, cancel }
    }
}

impl SaveSink for JsSink {
    /// Calls `save(documentJson)`. A callback that throws counts as not
    /// dispatched, so the editor does not stay stuck in the saving state.
    fn save(&mut self, document: AnimationDocument) -> Result<(), String> {
        let json = document.to_json().map_err(|e| e.to_string())?;
        self.save
            .call1(&JsValue::NULL, &JsValue::from_str(&json))
            .map(|_| ())
            .map_err(|e| format!("save callback threw: {e:?}"))
    }

    fn cancel(&mut self) {
        if let Err(e) = self.cancel.call0(&JsValue::NULL) {
            log::warn!("cancel callback threw: {e:?}");
        }
    }
}
