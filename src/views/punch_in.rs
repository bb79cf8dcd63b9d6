use gloo::timers::callback::Timeout;
use yew::prelude::*;

use super::animation::AnimationPlayer;
use super::share_guide::ShareGuide;
use super::use_app;
use crate::player::animation_url;
use crate::poems::{Poem, PoemCatalog};
use crate::quiz::{self, ExamOption, Phase, PunchInSession, Selection};
use crate::route::Route;
use crate::share::current_origin;

#[derive(Properties, PartialEq)]
pub struct PunchInProps {
    pub poem_id: u32,
}

#[function_component(PunchIn)]
pub fn punch_in(props: &PunchInProps) -> Html {
    let Some(ctx) = use_app() else {
        return html! {};
    };
    let catalog = ctx.catalog.clone();
    let config = ctx.config.clone();

    let session = {
        let catalog = catalog.clone();
        let poem_id = props.poem_id;
        use_state(move || PunchInSession::new(&catalog, poem_id))
    };
    let wrong_notice = use_state(|| false);
    let notice_timer = use_mut_ref(|| Option::<Timeout>::None);
    let show_flash = use_state(|| false);

    {
        let catalog = catalog.clone();
        use_effect_with(props.poem_id, move |poem_id| {
            preload_images(&catalog.line_up_images(*poem_id));
        });
    }

    let on_toggle_flash = {
        let show_flash = show_flash.clone();
        Callback::from(move |_| show_flash.set(!*show_flash))
    };

    let on_start_exam = {
        let session = session.clone();
        let catalog = catalog.clone();
        let distractors = config.distractor_count;
        Callback::from(move |_| {
            let mut next = (*session).clone();
            let mut rng = rand::thread_rng();
            match next.start_exam(&catalog, distractors, &mut rng) {
                Ok(()) => session.set(next),
                Err(e) => log::warn!("cannot start exam: {}", e),
            }
        })
    };

    let on_leave_exam = {
        let session = session.clone();
        let wrong_notice = wrong_notice.clone();
        Callback::from(move |_| {
            let mut next = (*session).clone();
            next.leave_exam();
            wrong_notice.set(false);
            session.set(next);
        })
    };

    // Check the picked picture; a wrong pick shows a notice for a moment
    let on_select = {
        let session = session.clone();
        let progress = ctx.progress.clone();
        let wrong_notice = wrong_notice.clone();
        let notice_timer = notice_timer.clone();
        let notice_ms = config.wrong_answer_notice_ms;
        Callback::from(move |option_id: usize| {
            let mut next = (*session).clone();
            match progress.update(|tracker| next.select(option_id, tracker)) {
                Selection::Correct { newly_completed } => {
                    log::info!(
                        "poem {} punched in (new: {})",
                        next.poem_id(),
                        newly_completed
                    );
                    notice_timer.borrow_mut().take();
                    wrong_notice.set(false);
                }
                Selection::Wrong => {
                    wrong_notice.set(true);
                    let wrong_notice = wrong_notice.clone();
                    let timer = Timeout::new(notice_ms, move || wrong_notice.set(false));
                    // Replacing the handle cancels the previous countdown
                    notice_timer.borrow_mut().replace(timer);
                }
                Selection::Ignored => return,
            }
            session.set(next);
        })
    };

    let on_dismiss_dialog = {
        let session = session.clone();
        Callback::from(move |_| {
            let mut next = (*session).clone();
            next.dismiss_success_dialog();
            session.set(next);
        })
    };

    let on_open_share = {
        let session = session.clone();
        Callback::from(move |_| {
            let mut next = (*session).clone();
            next.dismiss_success_dialog();
            if next.open_share() {
                session.set(next);
            }
        })
    };

    let on_close_share = {
        let session = session.clone();
        Callback::from(move |_| {
            let mut next = (*session).clone();
            next.close_share();
            session.set(next);
        })
    };

    let on_previous = {
        let session = session.clone();
        let navigate = ctx.navigate.clone();
        Callback::from(move |_| {
            let mut next = (*session).clone();
            if next.previous() {
                navigate.emit(Route::PunchIn(next.poem_id()));
            }
        })
    };

    let on_next = {
        let session = session.clone();
        let navigate = ctx.navigate.clone();
        Callback::from(move |_| {
            let mut next = (*session).clone();
            if next.next() {
                navigate.emit(Route::PunchIn(next.poem_id()));
            }
        })
    };

    let poem = session.poem(&catalog);
    let phase = session.phase();
    let already_completed = ctx.progress.completed().contains(poem.id);
    let media_url = animation_url(&config.animation_base_path, poem.id, &current_origin());

    html! {
        <section class={classes!("punch-in", ctx.is_tech().then_some("tech"))}>
            { render_poem_header(poem, already_completed) }

            {
                if session.punched_in() {
                    html! {
                        <div class="banner success-banner">
                            <span>{"🎉 今日任务已达成"}</span>
                            <button
                                class="btn btn-secondary"
                                onclick={on_open_share.clone()}
                                disabled={phase != Phase::Success}
                            >
                                {"分享给家人"}
                            </button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }

            {
                match phase {
                    Phase::Examining => render_exam_ui(
                        session.options(),
                        *wrong_notice,
                        &on_select,
                        &on_leave_exam,
                    ),
                    Phase::Reading | Phase::Success | Phase::Sharing => html! {
                        <>
                            { render_poem_body(poem) }

                            <div class="flash-panel">
                                <button class="btn btn-secondary" onclick={on_toggle_flash}>
                                    { if *show_flash { "收起动画" } else { "▶ 观看动画" } }
                                </button>
                                {
                                    if *show_flash {
                                        html! {
                                            <AnimationPlayer url={media_url} autoplay={config.autoplay} />
                                        }
                                    } else {
                                        html! {}
                                    }
                                }
                            </div>

                            { render_exam_entry(&session, poem, &catalog, &on_start_exam) }
                        </>
                    },
                }
            }

            <div class="poem-nav">
                <button class="btn btn-secondary" onclick={on_previous} disabled={!session.has_previous()}>
                    {"← 上一首"}
                </button>
                <span class="sub">{ poem.id }{" / "}{ catalog.last_id() }</span>
                <button class="btn btn-secondary" onclick={on_next} disabled={!session.has_next()}>
                    {"下一首 →"}
                </button>
            </div>

            {
                if session.success_dialog_visible() {
                    render_success_dialog(poem, session.wrong_attempts(), &on_open_share, &on_dismiss_dialog)
                } else {
                    html! {}
                }
            }

            {
                if phase == Phase::Sharing {
                    html! {
                        <ShareGuide
                            title={quiz::share_title(poem)}
                            desc={quiz::share_description(poem)}
                            on_close={on_close_share}
                        />
                    }
                } else {
                    html! {}
                }
            }
        </section>
    }
}

// --- Helper rendering functions -------------------------------------------------

fn render_poem_header(poem: &Poem, already_completed: bool) -> Html {
    html! {
        <header class="poem-header">
            <h1>{ format!("《{}》", poem.title) }</h1>
            <p class="sub">{ format!("[{}] {}", poem.dynasty, poem.author) }</p>
            {
                if already_completed {
                    html! { <span class="badge badge-done">{"✓ 已背会"}</span> }
                } else {
                    html! {}
                }
            }
        </header>
    }
}

fn render_poem_body(poem: &Poem) -> Html {
    html! {
        <div class="poem-body">
            {
                match poem.image() {
                    Some(src) => html! { <img class="poem-image" src={src.to_string()} alt={poem.title.clone()} /> },
                    None => html! {},
                }
            }
            <div class="verses">
                { for poem.content.iter().map(|line| html! { <p class="verse">{ line }</p> }) }
            </div>
        </div>
    }
}

fn render_exam_entry(
    session: &PunchInSession,
    poem: &Poem,
    catalog: &PoemCatalog,
    on_start_exam: &Callback<MouseEvent>,
) -> Html {
    if session.punched_in() {
        return html! {};
    }
    let can_start = session.can_start_exam(catalog);
    html! {
        <div class="exam-entry">
            <button class="btn btn-primary" onclick={on_start_exam.clone()} disabled={!can_start}>
                {"开始考试"}
            </button>
            {
                if !poem.has_image() {
                    html! { <p class="hint">{"这首诗还没有配图，暂时不能考试，去看看上一首或下一首吧。"}</p> }
                } else {
                    html! { <p class="hint">{"读完了吗？从下面的图片里找出这首诗的画面吧！"}</p> }
                }
            }
        </div>
    }
}

fn render_exam_ui(
    options: &[ExamOption],
    wrong_notice: bool,
    on_select: &Callback<usize>,
    on_leave_exam: &Callback<MouseEvent>,
) -> Html {
    html! {
        <div class="exam">
            <div class="exam-bar">
                <button class="btn btn-secondary" onclick={on_leave_exam.clone()}>{"← 返回"}</button>
                <h2>{"哪一幅画是这首诗？"}</h2>
            </div>
            <div class="exam-options">
                { for options.iter().map(|option| html! {
                    <ExamOptionCard key={option.id} option={option.clone()} on_select={on_select.clone()} />
                }) }
            </div>
            {
                if wrong_notice {
                    html! { <div class="notice notice-wrong">{"不对哦，再仔细想一想！"}</div> }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ExamOptionCardProps {
    option: ExamOption,
    on_select: Callback<usize>,
}

// One picture in the line-up; a picture that fails to load can be retried
#[function_component(ExamOptionCard)]
fn exam_option_card(props: &ExamOptionCardProps) -> Html {
    let attempt = use_state(|| 0u32);
    let failed = use_state(|| false);

    let on_error = {
        let failed = failed.clone();
        let src = props.option.src.clone();
        Callback::from(move |_: Event| {
            log::warn!("exam image {} failed to load", src);
            failed.set(true);
        })
    };

    let on_retry = {
        let attempt = attempt.clone();
        let failed = failed.clone();
        Callback::from(move |_: MouseEvent| {
            failed.set(false);
            attempt.set(*attempt + 1);
        })
    };

    let id = props.option.id;
    let letter = props.option.letter();
    html! {
        <div class={classes!("exam-option", failed.then_some("failed"))}>
            <button
                class="exam-pick"
                onclick={props.on_select.reform(move |_: MouseEvent| id)}
                disabled={*failed}
            >
                <span class="letter">{ letter }</span>
                <img
                    src={props.option.src_for_attempt(*attempt)}
                    alt={format!("选项 {}", letter)}
                    onerror={on_error}
                />
            </button>
            {
                if *failed {
                    html! {
                        <div class="image-error">
                            <p>{"图片加载失败"}</p>
                            <button class="btn btn-secondary" onclick={on_retry}>{"重新加载"}</button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

// Warm the browser cache with every picture the line-up can use
fn preload_images(sources: &[&str]) {
    for src in sources {
        match web_sys::HtmlImageElement::new() {
            Ok(image) => image.set_src(src),
            Err(e) => {
                log::debug!("image preload unavailable: {:?}", e);
                return;
            }
        }
    }
}

fn render_success_dialog(
    poem: &Poem,
    wrong_attempts: u32,
    on_share: &Callback<MouseEvent>,
    on_dismiss: &Callback<MouseEvent>,
) -> Html {
    let remark = if wrong_attempts == 0 {
        "一次就答对了，真棒！".to_string()
    } else {
        format!("试了 {} 次终于答对啦，继续加油！", wrong_attempts + 1)
    };
    html! {
        <div class="overlay">
            <div class="dialog success-dialog">
                <div class="dialog-icon">{"🏆"}</div>
                <h2>{"打卡成功！"}</h2>
                <p>{ format!("你已经背会了《{}》", poem.title) }</p>
                <p class="sub">{ remark }</p>
                <div class="row">
                    <button class="btn btn-primary" onclick={on_share.clone()}>{"分享给家人"}</button>
                    <button class="btn btn-secondary" onclick={on_dismiss.clone()}>{"知道了"}</button>
                </div>
            </div>
        </div>
    }
}
