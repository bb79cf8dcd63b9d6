use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorScreenProps {
    pub message: String,
    pub on_retry: Callback<MouseEvent>,
    pub on_home: Callback<MouseEvent>,
}

#[function_component(ErrorScreen)]
pub fn error_screen(props: &ErrorScreenProps) -> Html {
    html! {
        <div class="error-screen">
            <div class="error-icon">{"⚠️"}</div>
            <h2>{"出错了"}</h2>
            <p class="sub">{"抱歉，应用程序遇到了意外错误。请尝试刷新页面或返回首页。"}</p>
            <p class="error-detail">{ &props.message }</p>
            <div class="row">
                <button class="btn btn-primary" onclick={props.on_retry.clone()}>{"重试"}</button>
                <button class="btn btn-secondary" onclick={props.on_home.clone()}>{"返回首页"}</button>
            </div>
        </div>
    }
}
