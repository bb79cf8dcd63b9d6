use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::use_app;
use crate::poems::Poem;
use crate::route::Route;

#[function_component(Library)]
pub fn library() -> Html {
    let Some(ctx) = use_app() else {
        return html! {};
    };
    let query = use_state(String::new);

    let on_query_input = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            query.set(input.value());
        })
    };

    let results = ctx.catalog.search(query.trim(), ctx.config.library_render_cap);
    let completed = ctx.progress.completed();
    let total = ctx.catalog.len();
    let loaded_percent = if total == 0 { 0 } else { results.len() * 100 / total };

    html! {
        <section class="library">
            <header class="page-header">
                <span class="eyebrow">{ if ctx.is_tech() { "典藏诗库" } else { "诗词百宝箱" } }</span>
                <h1>{"诗库"}</h1>
            </header>

            <input
                class="search"
                type="search"
                placeholder="搜索诗名、作者或诗句"
                value={(*query).clone()}
                oninput={on_query_input}
            />

            {
                if results.is_empty() {
                    html! { <p class="sub empty">{"没有找到相关的诗词"}</p> }
                } else {
                    html! {
                        <ul class="poem-list">
                            { for results.iter().map(|poem| {
                                render_poem_card(poem, completed.contains(poem.id), &ctx.navigate)
                            }) }
                        </ul>
                    }
                }
            }

            <footer class="list-footer">
                <span class="sub">{"已加载 "}{ results.len() }{" / "}{ total }</span>
                <div class="bar">
                    <div class="bar-fill" style={format!("width: {}%", loaded_percent)} />
                </div>
            </footer>
        </section>
    }
}

// --- Helper rendering functions -------------------------------------------------

fn render_poem_card(poem: &Poem, done: bool, navigate: &Callback<Route>) -> Html {
    let id = poem.id;
    let onclick = navigate.reform(move |_: MouseEvent| Route::PunchIn(id));
    let first_line = poem.content.first().cloned().unwrap_or_default();
    html! {
        <li class={classes!("poem-card", done.then_some("done"))} {onclick}>
            <div class="poem-card-head">
                <h3>{ &poem.title }</h3>
                {
                    if done {
                        html! { <span class="badge badge-done">{"✓"}</span> }
                    } else {
                        html! {}
                    }
                }
            </div>
            <p class="sub">{ format!("[{}] {}", poem.dynasty, poem.author) }</p>
            <p class="verse">{ first_line }</p>
        </li>
    }
}
