use yew::prelude::*;

use super::use_app;
use crate::route::Route;

#[function_component(Home)]
pub fn home() -> Html {
    let Some(ctx) = use_app() else {
        return html! {};
    };
    let is_tech = ctx.is_tech();

    // Start with the first poem that has not been punched in yet
    let on_start_learning = {
        let catalog = ctx.catalog.clone();
        let progress = ctx.progress.clone();
        let navigate = ctx.navigate.clone();
        Callback::from(move |_| {
            let poem_id = catalog.first_uncompleted(progress.completed());
            navigate.emit(Route::PunchIn(poem_id));
        })
    };

    let on_view_stats = ctx.navigate.reform(|_: MouseEvent| Route::Stats);

    html! {
        <section class="home">
            <div class="hero-mark">{"🪶"}</div>
            {
                if is_tech {
                    html! { <h1 class="headline">{"星辰伴读，静谧入心"}</h1> }
                } else {
                    html! {
                        <h1 class="headline">
                            <span>{"沐浴晨光，"}</span>
                            <span class="gradient">{"开启诗意一天。"}</span>
                        </h1>
                    }
                }
            }
            <p class="sub">
                { if is_tech {
                    "小小诗人为您提供静谧的夜间研习环境，专注于深度阅读与感悟。"
                } else {
                    "小小诗人伴您开启明媚的晨间诵读，感受古诗词的律动与美好。"
                } }
            </p>
            <div class="row">
                <button class="btn btn-primary" onclick={on_start_learning}>
                    {"🪶 开始学习"}
                </button>
                <button class="btn btn-secondary" onclick={on_view_stats}>
                    {"查看成就"}
                </button>
            </div>
            <footer class="footer">
                <span>{"LITTLE POET VERSION "}{ env!("CARGO_PKG_VERSION") }</span>
            </footer>
        </section>
    }
}
