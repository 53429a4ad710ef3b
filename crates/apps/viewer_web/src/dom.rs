use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

pub const OVERLAY_TEXT: &str = "日本列島 3D（都道府県押し出し）";

const PANEL_STYLE: &str = "position:absolute;left:16px;top:16px;padding:12px;\
border-radius:8px;border:1px solid rgba(255,255,255,0.2);\
background:rgba(0,0,0,0.6);color:#fff;font:14px/1.4 sans-serif;pointer-events:none;";

const ERROR_STYLE: &str = "position:absolute;left:16px;top:16px;padding:12px;\
border-radius:8px;border:1px solid rgba(255,80,80,0.6);\
background:rgba(40,0,0,0.8);color:#fff;font:14px/1.4 sans-serif;white-space:pre-wrap;";

const TOOLTIP_STYLE: &str = "margin-top:6px;opacity:0.85;";

/// Caption panel drawn over the canvas, plus a hover line.
pub struct Overlay {
    panel: HtmlElement,
    tooltip: Element,
}

impl Overlay {
    pub fn attach(document: &Document, parent: &Element) -> Result<Self, JsValue> {
        let panel: HtmlElement = document
            .create_element("div")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("overlay is not an HtmlElement"))?;
        panel.set_attribute("style", PANEL_STYLE)?;

        let title = document.create_element("div")?;
        title.set_text_content(Some(OVERLAY_TEXT));
        panel.append_child(&title)?;

        let tooltip = document.create_element("div")?;
        tooltip.set_attribute("style", TOOLTIP_STYLE)?;
        panel.append_child(&tooltip)?;

        parent.append_child(&panel)?;
        Ok(Self { panel, tooltip })
    }

    pub fn set_tooltip(&self, text: Option<&str>) {
        if self.tooltip.text_content().as_deref().unwrap_or("") != text.unwrap_or("") {
            self.tooltip.set_text_content(text);
        }
    }

    pub fn remove(&self) {
        self.panel.remove();
    }
}

/// Leaves a message over the canvas after a failed mount. It owns no
/// listeners, so nothing needs releasing.
pub fn show_error(document: &Document, parent: &Element, message: &str) -> Result<(), JsValue> {
    let panel = document.create_element("div")?;
    panel.set_attribute("style", ERROR_STYLE)?;
    panel.set_attribute("role", "alert")?;
    panel.set_text_content(Some(message));
    parent.append_child(&panel)?;
    Ok(())
}
