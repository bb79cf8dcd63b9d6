use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use yew::prelude::*;

use super::use_app;
use crate::player::{self, PlayerStatus};
use crate::share::Platform;

#[derive(Properties, PartialEq)]
pub struct AnimationPlayerProps {
    pub url: String,
    #[prop_or(true)]
    pub autoplay: bool,
}

#[function_component(AnimationPlayer)]
pub fn animation_player(props: &AnimationPlayerProps) -> Html {
    let Some(ctx) = use_app() else {
        return html! {};
    };
    let status = use_state(|| PlayerStatus::Loading);
    let error = use_state(|| Option::<String>::None);
    let attempt = use_state(|| 0u32);
    // Bumped when an attempt is superseded or the player unmounts; a
    // finished load only applies if its generation is still current.
    let generation: Rc<Cell<u32>> = use_memo((), |_| Cell::new(0));
    let container = use_node_ref();
    let fullscreen = use_state(|| false);

    {
        let status = status.clone();
        let error = error.clone();
        let generation = generation.clone();
        let script_urls = ctx.config.player_script_urls.clone();
        use_effect_with((props.url.clone(), *attempt), move |(url, _)| {
            let current = generation.get();
            status.set(PlayerStatus::Loading);
            error.set(None);

            let url = url.clone();
            let guard = generation.clone();
            spawn_local(async move {
                let result = player::prepare(&script_urls, &url).await;
                if guard.get() != current {
                    return;
                }
                match result {
                    Ok(()) => status.set(PlayerStatus::Ready),
                    Err(e) => {
                        log::error!("animation unavailable: {}", e);
                        error.set(Some(e.to_string()));
                        status.set(PlayerStatus::Error);
                    }
                }
            });

            move || generation.set(generation.get().wrapping_add(1))
        });
    }

    let on_retry = {
        let attempt = attempt.clone();
        Callback::from(move |_| attempt.set(*attempt + 1))
    };

    let on_fullscreen = {
        let container = container.clone();
        let fullscreen = fullscreen.clone();
        Callback::from(move |_| {
            let Some(element) = container.cast::<Element>() else {
                return;
            };
            match player::toggle_fullscreen(&element, Platform::current().is_mobile) {
                Ok(state) => fullscreen.set(state),
                Err(e) => log::warn!("fullscreen toggle failed: {}", e),
            }
        })
    };

    html! {
        <div class="animation-player" ref={container}>
            {
                match *status {
                    PlayerStatus::Loading => html! {
                        <div class="player-state">
                            <div class="spinner" />
                            <p class="sub">{"动画加载中…"}</p>
                        </div>
                    },
                    PlayerStatus::Error => html! {
                        <div class="player-state error">
                            <p>{"动画加载失败"}</p>
                            <p class="sub">{ (*error).clone().unwrap_or_default() }</p>
                            <button class="btn btn-secondary" onclick={on_retry}>{"重新加载"}</button>
                        </div>
                    },
                    PlayerStatus::Ready => render_embed(&props.url, props.autoplay),
                }
            }
            <button class="btn btn-icon fullscreen" onclick={on_fullscreen} disabled={*status != PlayerStatus::Ready}>
                { if *fullscreen { "退出全屏" } else { "⛶ 全屏" } }
            </button>
        </div>
    }
}

fn render_embed(url: &str, autoplay: bool) -> Html {
    let play = if autoplay { "true" } else { "false" };
    html! {
        <object type="application/x-shockwave-flash" data={url.to_string()} width="100%" height="100%">
            <param name="movie" value={url.to_string()} />
            <param name="play" value={play} />
            <param name="loop" value="true" />
            <param name="quality" value="high" />
            <param name="wmode" value="opaque" />
            <embed
                src={url.to_string()}
                type="application/x-shockwave-flash"
                width="100%"
                height="100%"
                play={play}
                loop=true
                quality="high"
            />
        </object>
    }
}
