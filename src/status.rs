use crate::constants::STATUS_ELEMENT_ID;
use hud_core::StatusSink;
use web_sys as web;

/// Writes the state label into `#status-text` when the page has one.
pub struct DomStatus {
    element: Option<web::Element>,
}

impl DomStatus {
    pub fn new(document: &web::Document) -> Self {
        let element = document.get_element_by_id(STATUS_ELEMENT_ID);
        if element.is_none() {
            log::info!("[status] no #{STATUS_ELEMENT_ID}; labels go to the log only");
        }
        Self { element }
    }
}

impl StatusSink for DomStatus {
    fn show(&mut self, label: &str) {
        match &self.element {
            Some(el) => el.set_text_content(Some(label)),
            None => log::info!("[status] {label}"),
        }
    }
}
