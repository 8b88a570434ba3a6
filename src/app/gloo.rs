//! WASM application implementation
//!
//! Binds the signup page's DOM to the controller: wires the forms and buttons,
//! traps focus in the login dialog and repaints from the controller's screen
//! after every operation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, KeyboardEvent,
};

use super::App;
use crate::client::gloo::WasmClient;
use crate::error::{Error, ErrorKind, Result};
use crate::modal::{
    trap_focus, Key, ModalState, TrapAction, FIRST_INPUT_SELECTOR, FOCUSABLE_SELECTOR,
};
use crate::storage::LocalStorageTokenStore;
use crate::view::Banner;

const HIDDEN: &str = "hidden";
const DELETE_BUTTON_SELECTOR: &str = ".delete-btn";
const CLOSE_SELECTOR: &str = ".close";

type PageApp = App<WasmClient, LocalStorageTokenStore>;

struct Elements {
    document: Document,
    activities_list: Element,
    activity_select: HtmlSelectElement,
    signup_form: HtmlFormElement,
    message: Element,
    login_btn: Element,
    logout_btn: Element,
    login_modal: Element,
    login_form: HtmlFormElement,
    login_message: Element,
    user_display: Element,
    user_name: Element,
    signup_container: Element,
    close_modal: Element,
}

fn missing(what: &str) -> Error {
    ErrorKind::ParseError(format!("missing page element {what}")).into()
}

fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| missing(&format!("#{id}")))?
        .dyn_into::<T>()
        .map_err(|_| Error::from(ErrorKind::ParseError(format!("#{id} has an unexpected type"))))
}

impl Elements {
    fn resolve(document: Document) -> Result<Self> {
        let close_modal = document
            .query_selector(CLOSE_SELECTOR)
            .ok()
            .flatten()
            .ok_or_else(|| missing(CLOSE_SELECTOR))?;

        Ok(Self {
            activities_list: by_id(&document, "activities-list")?,
            activity_select: by_id(&document, "activity")?,
            signup_form: by_id(&document, "signup-form")?,
            message: by_id(&document, "message")?,
            login_btn: by_id(&document, "login-btn")?,
            logout_btn: by_id(&document, "logout-btn")?,
            login_modal: by_id(&document, "login-modal")?,
            login_form: by_id(&document, "login-form")?,
            login_message: by_id(&document, "login-message")?,
            user_display: by_id(&document, "user-display")?,
            user_name: by_id(&document, "user-name")?,
            signup_container: by_id(&document, "signup-container")?,
            close_modal,
            document,
        })
    }

    fn input_value(&self, id: &str) -> String {
        if let Ok(select) = by_id::<HtmlSelectElement>(&self.document, id) {
            return select.value();
        }
        by_id::<HtmlInputElement>(&self.document, id)
            .map(|input| input.value())
            .unwrap_or_default()
    }
}

fn set_hidden(element: &Element, hidden: bool) {
    let classes = element.class_list();
    let _ = if hidden {
        classes.add_1(HIDDEN)
    } else {
        classes.remove_1(HIDDEN)
    };
}

fn elements_matching<T: JsCast>(root: &Element, selector: &str) -> Vec<T> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

struct Page {
    app: PageApp,
    dom: Elements,
    modal: RefCell<ModalState<HtmlElement>>,
    focus_trap: RefCell<Option<EventListener>>,
    delete_buttons: RefCell<Vec<EventListener>>,
    banner_timer: RefCell<Option<Timeout>>,
    painted_revision: Cell<u64>,
    painted_banner: Cell<Option<u64>>,
}

impl Page {
    fn paint(self: &Rc<Self>) {
        let screen = self.app.screen().clone();
        let dom = &self.dom;

        set_hidden(&dom.login_btn, !screen.login_button_visible);
        set_hidden(&dom.user_display, screen.user_display.is_none());
        if let Some(name) = &screen.user_display {
            dom.user_name.set_text_content(Some(name));
        }
        set_hidden(&dom.signup_container, !screen.signup_visible);

        if self.painted_revision.get() != screen.activities_revision {
            self.painted_revision.set(screen.activities_revision);
            dom.activities_list
                .set_inner_html(&screen.activities.to_html());
            if let Some(list) = screen.activities.list() {
                dom.activity_select.set_inner_html(&list.options_html());
            }
            self.bind_delete_buttons();
        }

        match &screen.login_error {
            Some(text) => {
                dom.login_message.set_text_content(Some(text));
                dom.login_message.set_class_name("error");
            }
            None => set_hidden(&dom.login_message, true),
        }

        match &screen.banner {
            Some(banner) => self.show_banner(banner),
            None => set_hidden(&dom.message, true),
        }
    }

    fn show_banner(self: &Rc<Self>, banner: &Banner) {
        self.dom.message.set_text_content(Some(&banner.text));
        self.dom.message.set_class_name(banner.kind.class_name());

        if self.painted_banner.get() == Some(banner.id) {
            return;
        }
        self.painted_banner.set(Some(banner.id));

        let page = Rc::downgrade(self);
        let id = banner.id;
        let millis = u32::try_from(banner.hide_after.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || {
            if let Some(page) = page.upgrade() {
                if page.app.dismiss_banner(id) {
                    page.paint();
                }
            }
        });
        // replacing the handle cancels the previous banner's timer
        *self.banner_timer.borrow_mut() = Some(timeout);
    }

    /// Listeners go directly on each rendered button, so they are rebuilt after every re-render.
    fn bind_delete_buttons(self: &Rc<Self>) {
        let mut bound = self.delete_buttons.borrow_mut();
        bound.clear();

        if !self.app.session().is_authenticated() {
            return;
        }

        for button in elements_matching::<Element>(&self.dom.activities_list, DELETE_BUTTON_SELECTOR)
        {
            let activity = button.get_attribute("data-activity").unwrap_or_default();
            let email = button.get_attribute("data-email").unwrap_or_default();
            let page = Rc::downgrade(self);

            bound.push(EventListener::new(&button, "click", move |_| {
                let Some(page) = page.upgrade() else {
                    return;
                };
                let (activity, email) = (activity.clone(), email.clone());
                spawn_local(async move {
                    page.app.unregister(&activity, &email).await;
                    page.paint();
                });
            }));
        }
    }

    fn open_login(self: &Rc<Self>) {
        let previously_focused = self
            .dom
            .document
            .active_element()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        self.modal.borrow_mut().open(previously_focused);
        self.app.open_login();

        set_hidden(&self.dom.login_modal, false);
        if let Some(input) =
            elements_matching::<HtmlElement>(&self.dom.login_modal, FIRST_INPUT_SELECTOR)
                .into_iter()
                .next()
        {
            let _ = input.focus();
        }

        let page = Rc::downgrade(self);
        let trap = EventListener::new_with_options(
            &self.dom.login_modal,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                if let (Some(page), Some(event)) = (page.upgrade(), event.dyn_ref::<KeyboardEvent>())
                {
                    page.handle_modal_key(event);
                }
            },
        );
        *self.focus_trap.borrow_mut() = Some(trap);
    }

    fn handle_modal_key(self: &Rc<Self>, event: &KeyboardEvent) {
        let key = Key::from_event(&event.key(), event.shift_key());
        let focusable = elements_matching::<HtmlElement>(&self.dom.login_modal, FOCUSABLE_SELECTOR);
        let active = self.dom.document.active_element().and_then(|active| {
            focusable.iter().position(|candidate| {
                let candidate: &Element = candidate.as_ref();
                *candidate == active
            })
        });

        match trap_focus(key, active, focusable.len()) {
            TrapAction::Ignore => {}
            TrapAction::FocusFirst => {
                event.prevent_default();
                if let Some(first) = focusable.first() {
                    let _ = first.focus();
                }
            }
            TrapAction::FocusLast => {
                event.prevent_default();
                if let Some(last) = focusable.last() {
                    let _ = last.focus();
                }
            }
            TrapAction::Close => {
                // closing drops this listener, so leave its callback first
                let page = Rc::clone(self);
                spawn_local(async move { page.close_login() });
            }
        }
    }

    fn close_login(self: &Rc<Self>) {
        self.app.close_login();
        set_hidden(&self.dom.login_modal, true);
        set_hidden(&self.dom.login_message, true);

        self.focus_trap.borrow_mut().take();

        let previously_focused = self.modal.borrow_mut().close();
        if let Some(element) = previously_focused {
            let _ = element.focus();
        }
        self.paint();
    }

    fn wire(page: &Rc<Self>) -> Result<()> {
        let dom = &page.dom;

        let p = Rc::clone(page);
        EventListener::new(&dom.login_btn, "click", move |_| p.open_login()).forget();

        let p = Rc::clone(page);
        EventListener::new(&dom.close_modal, "click", move |_| p.close_login()).forget();

        let window = web_sys::window().ok_or_else(|| missing("window"))?;
        let p = Rc::clone(page);
        EventListener::new(&window, "click", move |event: &Event| {
            let modal: &EventTarget = p.dom.login_modal.as_ref();
            if p.modal.borrow().is_open() && event.target().as_ref() == Some(modal) {
                p.close_login();
            }
        })
        .forget();

        let p = Rc::clone(page);
        EventListener::new_with_options(
            &dom.login_form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                let page = Rc::clone(&p);
                let username = page.dom.input_value("username");
                let password = page.dom.input_value("password");
                spawn_local(async move {
                    if page.app.submit_login(&username, &password).await {
                        page.close_login();
                        page.dom.login_form.reset();
                    }
                    page.paint();
                });
            },
        )
        .forget();

        let p = Rc::clone(page);
        EventListener::new(&dom.logout_btn, "click", move |_| {
            let page = Rc::clone(&p);
            spawn_local(async move {
                page.app.logout().await;
                page.paint();
            });
        })
        .forget();

        let p = Rc::clone(page);
        EventListener::new_with_options(
            &dom.signup_form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                let page = Rc::clone(&p);
                let email = page.dom.input_value("email");
                let activity = page.dom.input_value("activity");
                spawn_local(async move {
                    if page.app.signup(&activity, &email).await {
                        page.dom.signup_form.reset();
                    }
                    page.paint();
                });
            },
        )
        .forget();

        Ok(())
    }
}

fn mount() -> Result<Rc<Page>> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| missing("document"))?;

    let page = Rc::new(Page {
        app: App::new(WasmClient::default(), LocalStorageTokenStore),
        dom: Elements::resolve(document)?,
        modal: RefCell::new(ModalState::default()),
        focus_trap: RefCell::new(None),
        delete_buttons: RefCell::new(Vec::new()),
        banner_timer: RefCell::new(None),
        painted_revision: Cell::new(0),
        painted_banner: Cell::new(None),
    });
    Page::wire(&page)?;
    Ok(page)
}

/// Browser entry point.
#[wasm_bindgen(start)]
pub fn run() -> std::result::Result<(), JsValue> {
    crate::logging::init_console(log::LevelFilter::Info);

    let page = mount().map_err(|e| JsValue::from_str(&e.to_string()))?;
    page.paint();

    spawn_local(async move {
        page.app.start().await;
        page.paint();
    });
    Ok(())
}
