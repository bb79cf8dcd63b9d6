use yew::prelude::*;

use super::use_app;
use crate::progress::ProgressStats;

#[function_component(Profile)]
pub fn profile() -> Html {
    let Some(ctx) = use_app() else {
        return html! {};
    };
    let stats = ProgressStats::compute(&ctx.catalog, ctx.progress.completed());
    let mode = ctx.theme.mode;
    let on_toggle = ctx.toggle_mode.reform(|_: MouseEvent| ());

    html! {
        <section class="profile">
            <div class="profile-card">
                <div class="avatar">{"🧒"}</div>
                <div>
                    <h2>{"小小诗人"}</h2>
                    <p class="sub">{ format!("已背会 {} 首 · 完成 {}%", stats.completed, stats.percent) }</p>
                </div>
            </div>

            <ul class="settings">
                <li class="setting">
                    <span>{"显示模式"}</span>
                    <button class="btn btn-secondary" title={mode.toggle_hint()} onclick={on_toggle}>
                        { mode.label() }
                    </button>
                </li>
                <li class="setting">
                    <span>{"当前主题"}</span>
                    <span class="sub">{ if ctx.is_tech() { "星空夜读" } else { "晨光童趣" } }</span>
                </li>
                <li class="setting">
                    <span>{"版本"}</span>
                    <span class="sub">{ env!("CARGO_PKG_VERSION") }</span>
                </li>
            </ul>
        </section>
    }
}
