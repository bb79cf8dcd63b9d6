use gloo::timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::use_app;
use crate::share::{self, Platform};

#[derive(Properties, PartialEq)]
pub struct ShareGuideProps {
    pub title: String,
    pub desc: String,
    pub on_close: Callback<MouseEvent>,
}

#[function_component(ShareGuide)]
pub fn share_guide(props: &ShareGuideProps) -> Html {
    let Some(ctx) = use_app() else {
        return html! {};
    };
    let platform = use_memo((), |_| Platform::current());
    let copied = use_state(|| false);
    let copied_timer = use_mut_ref(|| Option::<Timeout>::None);

    let on_copy = {
        let copied = copied.clone();
        let copied_timer = copied_timer.clone();
        let notice_ms = ctx.config.copied_notice_ms;
        Callback::from(move |_| {
            let copied = copied.clone();
            let copied_timer = copied_timer.clone();
            spawn_local(async move {
                match share::copy_text(&share::current_url()).await {
                    Ok(method) => log::debug!("link copied via {:?}", method),
                    Err(e) => {
                        log::warn!("copy failed: {}", e);
                        return;
                    }
                }
                copied.set(true);
                let reset = copied.clone();
                copied_timer
                    .borrow_mut()
                    .replace(Timeout::new(notice_ms, move || reset.set(false)));
            });
        })
    };

    let on_open_chat = {
        let platform = *platform;
        Callback::from(move |_| share::open_chat_app(platform))
    };

    html! {
        <div class="overlay share-overlay">
            <div class="dialog share-dialog">
                <button class="close" onclick={props.on_close.clone()}>{"✕"}</button>
                <h2>{ &props.title }</h2>
                <p class="sub">{ &props.desc }</p>

                {
                    if platform.in_wechat {
                        html! {
                            <div class="wechat-guide">
                                <div class="arrow">{"↗"}</div>
                                <p>{"点击右上角"}<strong>{" ··· "}</strong>{"发送给朋友或分享到朋友圈"}</p>
                            </div>
                        }
                    } else {
                        html! {
                            <div class="share-actions">
                                <div class="link-box">
                                    <span class="link">{ share::current_origin() }</span>
                                </div>
                                <button class="btn btn-primary" onclick={on_copy}>
                                    { if *copied { "✓ 已复制" } else { "复制链接" } }
                                </button>
                                {
                                    if platform.offers_chat_button() {
                                        html! {
                                            <button class="btn btn-secondary" onclick={on_open_chat}>
                                                {"打开微信"}
                                            </button>
                                        }
                                    } else {
                                        html! {}
                                    }
                                }
                            </div>
                        }
                    }
                }

                <button class="btn btn-secondary" onclick={props.on_close.clone()}>{"返回"}</button>
            </div>
        </div>
    }
}
