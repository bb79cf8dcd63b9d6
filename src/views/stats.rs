use yew::prelude::*;

use super::use_app;
use crate::progress::ProgressStats;
use crate::route::Route;

#[function_component(Stats)]
pub fn stats() -> Html {
    let Some(ctx) = use_app() else {
        return html! {};
    };
    let is_tech = ctx.is_tech();
    let stats = ProgressStats::compute(&ctx.catalog, ctx.progress.completed());

    let next_title = ctx
        .catalog
        .get(stats.next_target)
        .map(|poem| poem.title.clone())
        .unwrap_or_default();
    let on_continue = ctx
        .navigate
        .reform(move |_: MouseEvent| Route::PunchIn(stats.next_target));

    let cards = [
        ("累计诵读", stats.completed.to_string(), "首"),
        ("尚未背诵", stats.remaining.to_string(), "首"),
        ("完成进度", stats.percent.to_string(), "%"),
        ("诗库总量", stats.total.to_string(), "首"),
    ];

    html! {
        <section class="stats">
            <header class="page-header">
                <span class="eyebrow">
                    { if is_tech { "研习数据统计" } else { "成长轨迹 / 研习表现" } }
                </span>
                <h1>{ if is_tech { "诵读成果统计" } else { "我的成长点滴" } }</h1>
            </header>

            <div class="stat-grid">
                { for cards.iter().map(|(label, value, unit)| html! {
                    <div class="stat-card">
                        <p class="stat-label">{ *label }</p>
                        <p>
                            <span class="stat-value">{ value }</span>
                            <span class="stat-unit">{ *unit }</span>
                        </p>
                    </div>
                }) }
            </div>

            <div class="panel">
                <h3>{"朝代分布"}</h3>
                <ul class="dynasty-bars">
                    { for stats.by_dynasty.iter().map(|d| {
                        let width = if d.total == 0 { 0 } else { d.completed * 100 / d.total };
                        html! {
                            <li>
                                <span class="dynasty">{ &d.dynasty }</span>
                                <div class="bar">
                                    <div class="bar-fill" style={format!("width: {}%", width)} />
                                </div>
                                <span class="count">{ d.completed }{"/"}{ d.total }</span>
                            </li>
                        }
                    }) }
                </ul>
            </div>

            <div class="panel">
                <p class="sub">{"下一首："}<strong>{ format!("《{}》", next_title) }</strong></p>
                <button class="btn btn-primary" onclick={on_continue}>{"继续学习"}</button>
            </div>
        </section>
    }
}
