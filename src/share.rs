use js_sys::{Function, Promise, Reflect};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlDocument, HtmlTextAreaElement};

const CHAT_SCHEME: &str = "weixin://";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Platform {
    pub in_wechat: bool,
    pub is_mobile: bool,
    pub is_android: bool,
}

impl Platform {
    pub fn detect(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        Self {
            in_wechat: ua.contains("micromessenger"),
            is_mobile: ["android", "iphone", "ipad", "ipod", "mobile"]
                .iter()
                .any(|needle| ua.contains(needle)),
            is_android: ua.contains("android"),
        }
    }

    pub fn current() -> Self {
        let ua = web_sys::window()
            .and_then(|window| window.navigator().user_agent().ok())
            .unwrap_or_default();
        Self::detect(&ua)
    }

    /// The "open WeChat" button only makes sense on a phone outside WeChat.
    pub fn offers_chat_button(&self) -> bool {
        !self.in_wechat && self.is_mobile
    }
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("no browser window")]
    NoWindow,

    #[error("copy failed: {0}")]
    Copy(String),
}

fn js_err(e: JsValue) -> ShareError {
    ShareError::Copy(format!("{:?}", e))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyMethod {
    Clipboard,
    Selection,
}

pub fn current_url() -> String {
    web_sys::window()
        .and_then(|window| window.location().href().ok())
        .unwrap_or_default()
}

pub fn current_origin() -> String {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default()
}

/// Copy `text` with the async clipboard API, falling back to selecting a
/// throwaway textarea and `execCommand("copy")`.
pub async fn copy_text(text: &str) -> Result<CopyMethod, ShareError> {
    match clipboard_write(text).await {
        Ok(()) => Ok(CopyMethod::Clipboard),
        Err(e) => {
            log::debug!("clipboard API unavailable ({}), using selection copy", e);
            selection_copy(text)?;
            Ok(CopyMethod::Selection)
        }
    }
}

async fn clipboard_write(text: &str) -> Result<(), ShareError> {
    let window = web_sys::window().ok_or(ShareError::NoWindow)?;
    let navigator: JsValue = window.navigator().into();
    let clipboard = Reflect::get(&navigator, &"clipboard".into()).map_err(js_err)?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(ShareError::Copy("navigator.clipboard is missing".into()));
    }
    let write_text: Function = Reflect::get(&clipboard, &"writeText".into())
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    let promise: Promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    JsFuture::from(promise).await.map_err(js_err)?;
    Ok(())
}

fn selection_copy(text: &str) -> Result<(), ShareError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(ShareError::NoWindow)?;
    let body = document.body().ok_or(ShareError::NoWindow)?;

    let textarea: HtmlTextAreaElement = document
        .create_element("textarea")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|e| js_err(e.into()))?;
    textarea.set_value(text);
    body.append_child(&textarea).map_err(js_err)?;
    textarea.select();

    let copied = document
        .dyn_ref::<HtmlDocument>()
        .ok_or_else(|| ShareError::Copy("not an HTML document".into()))
        .and_then(|html| html.exec_command("copy").map_err(js_err));
    let _ = body.remove_child(&textarea);

    match copied? {
        true => Ok(()),
        false => Err(ShareError::Copy("execCommand refused".into())),
    }
}

/// Android can be handed the chat app's URL scheme; iOS blocks that, so the
/// user is asked to switch apps by hand.
pub fn open_chat_app(platform: Platform) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if platform.is_android {
        if let Err(e) = window.location().set_href(CHAT_SCHEME) {
            log::warn!("could not open chat app: {:?}", e);
        }
    } else {
        let _ = window.alert_with_message("请手动打开微信，将链接分享给好友");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const WECHAT_ANDROID: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/116.0 Mobile Safari/537.36 MicroMessenger/8.0.42";
    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36";
    const DESKTOP_FIREFOX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

    #[rstest]
    #[case(WECHAT_ANDROID, true, true, true, false)]
    #[case(IPHONE_SAFARI, false, true, false, true)]
    #[case(ANDROID_CHROME, false, true, true, true)]
    #[case(DESKTOP_FIREFOX, false, false, false, false)]
    #[case("", false, false, false, false)]
    fn detects_platform(
        #[case] ua: &str,
        #[case] in_wechat: bool,
        #[case] is_mobile: bool,
        #[case] is_android: bool,
        #[case] chat_button: bool,
    ) {
        let platform = Platform::detect(ua);
        assert_eq!(
            platform,
            Platform {
                in_wechat,
                is_mobile,
                is_android
            }
        );
        assert_eq!(platform.offers_chat_button(), chat_button);
    }
}
