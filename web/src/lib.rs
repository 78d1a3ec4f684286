//! Browser host for the todo app.
//!
//! Binds the page's form and list container to a `ViewModel`, runs the
//! requests it dispatches with `fetch`, and applies the resulting reactions:
//! alerts, console logs and clearing the title input.

mod dom;
mod fetch;

use std::cell::RefCell;
use std::rc::Rc;

use todo_core::{Notice, Reaction, TodoClient, TodoStore, UiEvent, ViewModel, DEFAULT_BASE_URL};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Event;

use dom::Page;

struct App {
    vm: RefCell<ViewModel>,
    page: Page,
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let page = Page::query(&document)?;

    let app = Rc::new(App {
        vm: RefCell::new(ViewModel::new(TodoClient::new(DEFAULT_BASE_URL), TodoStore::new())),
        page: page.clone(),
    });

    let on_submit = {
        let app = Rc::clone(&app);
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            let title = app.page.title_input().map(|input| input.value()).unwrap_or_default();
            let reaction = app.vm.borrow_mut().handle(UiEvent::Submit { title });
            apply(&app, reaction);
        })
    };
    page.form
        .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();

    let on_click = {
        let app = Rc::clone(&app);
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(ui_event) = dom::decode_click(&event) else {
                return;
            };
            let reaction = app.vm.borrow_mut().handle(ui_event);
            apply(&app, reaction);
        })
    };
    page.list
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    let reaction = app.vm.borrow_mut().bootstrap(move |rendered| page.show(rendered));
    apply(&app, reaction);
    Ok(())
}

fn apply(app: &Rc<App>, reaction: Reaction) {
    match reaction.notice {
        Some(Notice::Alert(message)) => {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&message);
            }
        }
        Some(Notice::Log(message)) => web_sys::console::error_1(&message.into()),
        None => {}
    }

    if reaction.clear_input {
        if let Some(input) = app.page.title_input() {
            input.set_value("");
        }
    }

    for dispatch in reaction.dispatch {
        let app = Rc::clone(app);
        spawn_local(async move {
            let outcome = fetch::execute(dispatch.request).await;
            let reaction = app.vm.borrow_mut().complete(dispatch.ticket, outcome);
            apply(&app, reaction);
        });
    }
}
