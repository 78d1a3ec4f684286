//! Page elements and click decoding.

use todo_core::{Rendered, UiEvent};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlFormElement, HtmlInputElement};

/// The elements the app binds to.
#[derive(Clone)]
pub struct Page {
    pub form: HtmlFormElement,
    pub incomplete: Element,
    pub complete: Element,
    /// Container housing both lists; receives every list click.
    pub list: Element,
}

impl Page {
    pub fn query(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            form: find(document, ".form")?.dyn_into()?,
            incomplete: find(document, ".todo-list")?,
            complete: find(document, ".list-complete")?,
            list: find(document, ".todo-list-full")?,
        })
    }

    pub fn title_input(&self) -> Option<HtmlInputElement> {
        self.form
            .query_selector("input")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into().ok())
    }

    pub fn show(&self, rendered: &Rendered) {
        self.incomplete.set_inner_html(&rendered.incomplete);
        self.complete.set_inner_html(&rendered.complete);
    }
}

fn find(document: &Document, selector: &str) -> Result<Element, JsValue> {
    document
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("missing element {selector}")))
}

/// Turn a click inside the list into a `UiEvent`.
///
/// Walks up from the target to the nearest element with `data-command`.
/// Clicks elsewhere (list padding, the inline input) yield `None`.
pub fn decode_click(event: &Event) -> Option<UiEvent> {
    let target: Element = event.target()?.dyn_into().ok()?;
    let control = target.closest("[data-command]").ok()??;
    let command = control.get_attribute("data-command")?;
    let id = control.get_attribute("data-id")?;
    UiEvent::from_control(&command, &id, inline_input(&control))
}

/// Value of the text field sharing the control's `<li>`.
fn inline_input(control: &Element) -> Option<String> {
    let item = control.closest("li").ok()??;
    let input: HtmlInputElement = item.query_selector("input[type=text]").ok()??.dyn_into().ok()?;
    Some(input.value())
}
