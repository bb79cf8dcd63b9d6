use wasm_bindgen::JsValue;

use crate::poems::PoemCatalog;

pub const POEM_ID_PARAM: &str = "poemId";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Stats,
    Library,
    Profile,
    PunchIn(u32),
}

impl Route {
    /// `/home` and unknown paths land on Home.
    pub fn parse(path: &str, poem_id: Option<&str>, catalog: &PoemCatalog) -> Self {
        match path.trim_end_matches('/') {
            "/stats" => Route::Stats,
            "/library" => Route::Library,
            "/profile" => Route::Profile,
            "/punch-in" => Route::PunchIn(catalog.resolve_id(poem_id)),
            _ => Route::Home,
        }
    }

    pub fn href(&self) -> String {
        match self {
            Route::Home => "/".into(),
            Route::Stats => "/stats".into(),
            Route::Library => "/library".into(),
            Route::Profile => "/profile".into(),
            Route::PunchIn(id) => format!("/punch-in?{}={}", POEM_ID_PARAM, id),
        }
    }

    pub fn nav_items() -> [(Route, &'static str); 4] {
        [
            (Route::Home, "首页"),
            (Route::Stats, "统计"),
            (Route::Library, "诗库"),
            (Route::Profile, "我的"),
        ]
    }

    pub fn same_page(&self, other: &Route) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    // Route for the page currently in the address bar
    pub fn current(catalog: &PoemCatalog) -> Self {
        let Some(window) = web_sys::window() else {
            return Route::Home;
        };
        let location = window.location();
        let path = location.pathname().unwrap_or_default();
        let poem_id = location
            .search()
            .ok()
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
            .and_then(|params| params.get(POEM_ID_PARAM));
        let route = Route::parse(&path, poem_id.as_deref(), catalog);
        if path == "/home" {
            replace(&route);
        }
        route
    }

    pub fn push(&self) {
        let Some(history) = web_sys::window().and_then(|window| window.history().ok()) else {
            return;
        };
        if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(&self.href())) {
            log::warn!("history push to {} failed: {:?}", self.href(), e);
        }
    }
}

fn replace(route: &Route) {
    if let Some(history) = web_sys::window().and_then(|window| window.history().ok()) {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&route.href()));
    }
}
