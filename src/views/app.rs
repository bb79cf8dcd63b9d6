use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use yew::prelude::*;

use super::error_screen::ErrorScreen;
use super::home::Home;
use super::library::Library;
use super::profile::Profile;
use super::punch_in::PunchIn;
use super::stats::Stats;
use super::{AppContext, ProgressHandle};
use crate::clock::SystemClock;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::poems::PoemCatalog;
use crate::progress::ProgressTracker;
use crate::route::Route;
use crate::storage::LocalStorage;
use crate::theme::{Theme, ThemeController, ThemeMode};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<AppConfig>,
}

// A library that fails to load gets the error screen instead of the shell
#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let catalog = use_state(load_catalog);

    let on_retry = {
        let catalog = catalog.clone();
        Callback::from(move |_| catalog.set(load_catalog()))
    };

    let on_home = {
        let catalog = catalog.clone();
        Callback::from(move |_| {
            Route::Home.push();
            catalog.set(load_catalog());
        })
    };

    match &*catalog {
        Ok(catalog) => html! {
            <Shell catalog={catalog.clone()} config={props.config.clone()} />
        },
        Err(message) => html! {
            <ErrorScreen message={message.clone()} {on_retry} {on_home} />
        },
    }
}

fn load_catalog() -> Result<Rc<PoemCatalog>, String> {
    PoemCatalog::bundled().map(Rc::new).map_err(|e| {
        let e = AppError::from(e);
        log::error!("{}", e);
        e.to_string()
    })
}

#[derive(Properties, PartialEq)]
struct ShellProps {
    catalog: Rc<PoemCatalog>,
    config: Rc<AppConfig>,
}

#[function_component(Shell)]
fn shell(props: &ShellProps) -> Html {
    let catalog = props.catalog.clone();
    let config = props.config.clone();

    let controller = use_mut_ref(|| {
        ThemeController::load(LocalStorage, SystemClock, config.theme_mode_key.clone())
    });
    let theme_state = use_state(|| controller.borrow().state());

    let tracker = use_mut_ref(|| {
        ProgressTracker::load(LocalStorage, config.completed_poems_key.clone())
    });
    let completed = use_state(|| tracker.borrow().completed().clone());

    let route = {
        let catalog = catalog.clone();
        use_state(move || Route::current(&catalog))
    };

    // Theme changes come back through the controller's subscription
    {
        let controller = controller.clone();
        let theme_state = theme_state.clone();
        use_effect_with((), move |_| {
            let id = controller
                .borrow_mut()
                .subscribe(move |state| theme_state.set(state));
            move || controller.borrow_mut().unsubscribe(id)
        });
    }

    // Re-read the clock while in automatic mode
    {
        let controller = controller.clone();
        let poll_ms = config.theme_poll_ms;
        use_effect_with(theme_state.mode, move |mode| {
            let interval = (*mode == ThemeMode::Auto).then(|| {
                Interval::new(poll_ms, move || {
                    controller.borrow_mut().refresh();
                })
            });
            move || drop(interval)
        });
    }

    use_effect_with(theme_state.theme, |theme| apply_root_class(*theme));

    // Browser back/forward
    {
        let route = route.clone();
        let catalog = catalog.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|window| {
                EventListener::new(&window, "popstate", move |_| {
                    route.set(Route::current(&catalog));
                })
            });
            move || drop(listener)
        });
    }

    let toggle_mode = {
        let controller = controller.clone();
        Callback::from(move |_: ()| {
            controller.borrow_mut().toggle_mode();
        })
    };

    let navigate = {
        let route = route.clone();
        Callback::from(move |next: Route| {
            next.push();
            route.set(next);
        })
    };

    let ctx = AppContext {
        catalog,
        config,
        theme: *theme_state,
        toggle_mode: toggle_mode.clone(),
        navigate: navigate.clone(),
        progress: ProgressHandle {
            tracker,
            completed,
        },
    };

    let is_tech = ctx.is_tech();
    let mode = theme_state.mode;
    let current = *route;

    let page = match current {
        Route::Home => html! { <Home /> },
        Route::Stats => html! { <Stats /> },
        Route::Library => html! { <Library /> },
        Route::Profile => html! { <Profile /> },
        // Keyed so moving to another poem starts a fresh session
        Route::PunchIn(poem_id) => html! { <PunchIn key={poem_id} {poem_id} /> },
    };

    let on_toggle = toggle_mode.reform(|_: MouseEvent| ());

    html! {
        <ContextProvider<AppContext> context={ctx}>
            <div class={classes!("app-shell", if is_tech { "skin-tech" } else { "skin-childlike" })}>
                <header class="top-bar">
                    <nav class="top-nav">
                        <div class="brand">
                            <span class="brand-mark">{"🪶"}</span>
                            <span class="brand-name">{"小小诗人"}</span>
                        </div>
                        <div class="nav-links">
                            { for Route::nav_items().into_iter().map(|(target, label)| {
                                render_nav_link(target, label, current, &navigate)
                            }) }
                        </div>
                        <button class="mode-toggle" title={mode.toggle_hint()} onclick={on_toggle.clone()}>
                            { render_mode_icon(mode) }
                        </button>
                    </nav>
                </header>

                <main class="page">
                    { page }
                </main>

                <nav class="tab-bar">
                    { for Route::nav_items().into_iter().map(|(target, label)| {
                        render_nav_link(target, label, current, &navigate)
                    }) }
                    <button class="tab mode-toggle" title={mode.toggle_hint()} onclick={on_toggle}>
                        { render_mode_icon(mode) }
                        <span class="tab-label">{ mode.label() }</span>
                    </button>
                </nav>
            </div>
        </ContextProvider<AppContext>>
    }
}

// --- Helper rendering functions -------------------------------------------------

fn render_nav_link(target: Route, label: &str, current: Route, navigate: &Callback<Route>) -> Html {
    let active = target.same_page(&current);
    let onclick = navigate.reform(move |e: MouseEvent| {
        e.prevent_default();
        target
    });
    html! {
        <a href={target.href()} class={classes!("nav-link", active.then_some("active"))} {onclick}>
            { label }
        </a>
    }
}

fn render_mode_icon(mode: ThemeMode) -> Html {
    match mode {
        ThemeMode::Auto => html! {
            <>
                <span class="icon">{"✨"}</span>
                <span class="badge-auto">{"AUTO"}</span>
            </>
        },
        ThemeMode::Day => html! { <span class="icon">{"☀️"}</span> },
        ThemeMode::Night => html! { <span class="icon">{"🌙"}</span> },
    }
}

fn apply_root_class(theme: Theme) {
    let Some(root) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element())
    else {
        return;
    };
    let classes = root.class_list();
    let _ = classes.remove_2(Theme::Tech.css_class(), Theme::Childlike.css_class());
    let _ = classes.add_1(theme.css_class());
}
