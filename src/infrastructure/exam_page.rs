//! 考试页面 - 基础设施层
//!
//! 基于 `JsExecutor` 实现题目提取与页面点击。
//! 所有字符串在拼进脚本前都经过 JSON 转义。

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info};

use crate::config::{Config, ExamSelectors};
use crate::error::{ActivationError, ExamError, ExtractionError};
use crate::infrastructure::capabilities::{ExamActivator, ExamExtractor};
use crate::infrastructure::js_executor::JsExecutor;

/// 轮询元素状态的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 页面脚本返回的原始题目
#[derive(Debug, Deserialize)]
struct RawQuestion {
    text: String,
    options: Vec<String>,
}

/// 浏览器中的考试页面
pub struct ExamPage {
    executor: JsExecutor,
    exam_url: String,
    selectors: ExamSelectors,
    element_timeout: Duration,
    page_settle: Duration,
}

impl ExamPage {
    pub fn new(executor: JsExecutor, config: &Config) -> Self {
        Self {
            executor,
            exam_url: config.exam_url.clone(),
            selectors: config.selectors.clone(),
            element_timeout: config.element_timeout(),
            page_settle: config.page_settle(),
        }
    }

    /// 等待元素出现且可点击，超时返回错误
    async fn wait_until_clickable(&self, selector: &str) -> Result<(), ExamError> {
        let script = clickable_script(selector);
        let started = Instant::now();

        let waited = timeout(self.element_timeout, async {
            loop {
                match self.executor.eval_as::<bool>(script.as_str()).await {
                    Ok(true) => return Ok(()),
                    Ok(false) => {}
                    Err(e) => debug!("检查元素 {} 状态失败: {}", selector, e),
                }
                sleep(POLL_INTERVAL).await;
            }
        })
        .await;

        match waited {
            Ok(result) => {
                debug!("元素 {} 可点击 (等待 {:?})", selector, started.elapsed());
                result
            }
            Err(_) => Err(ExamError::Timeout {
                selector: selector.to_string(),
                secs: self.element_timeout.as_secs(),
            }),
        }
    }

    /// 点击匹配选择器的第一个元素
    async fn click(&self, selector: &str) -> Result<(), ExamError> {
        let clicked: bool = self
            .executor
            .eval_as(click_script(selector))
            .await
            .map_err(|e| ExamError::Script(e.to_string()))?;

        if clicked {
            Ok(())
        } else {
            Err(ExamError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
    }

    fn container_id(&self, ordinal: usize) -> String {
        format!("{}{}", self.selectors.question_id_prefix, ordinal)
    }
}

#[async_trait]
impl ExamExtractor for ExamPage {
    async fn extract_question(&self, ordinal: usize) -> Result<(String, Vec<String>), ExtractionError> {
        let script = extract_script(
            &self.container_id(ordinal),
            &self.selectors.question_text,
            &self.selectors.option_label,
        );

        let raw: Option<RawQuestion> =
            self.executor
                .eval_as(script)
                .await
                .map_err(|e| ExtractionError::Page {
                    ordinal,
                    message: e.to_string(),
                })?;

        let raw = raw.ok_or(ExtractionError::NotFound { ordinal })?;
        Ok((raw.text, raw.options))
    }
}

#[async_trait]
impl ExamActivator for ExamPage {
    async fn start_exam(&self) -> Result<(), ExamError> {
        self.executor
            .goto(&self.exam_url)
            .await
            .map_err(|e| ExamError::Script(e.to_string()))?;

        self.wait_until_clickable(&self.selectors.start_button).await?;
        self.click(&self.selectors.start_button).await?;
        info!("✓ 已点击开始考试");

        // 等待题目渲染
        sleep(self.page_settle).await;
        Ok(())
    }

    async fn activate_option(&self, ordinal: usize, option: &str) -> Result<(), ActivationError> {
        let clicked: bool = self
            .executor
            .eval_as(activate_script(
                &self.container_id(ordinal),
                &self.selectors.option_label,
                option,
            ))
            .await
            .map_err(|e| ActivationError::Page {
                ordinal,
                message: e.to_string(),
            })?;

        if clicked {
            Ok(())
        } else {
            Err(ActivationError::NotFound {
                ordinal,
                option: option.to_string(),
            })
        }
    }

    async fn submit_exam(&self) -> Result<(), ExamError> {
        self.wait_until_clickable(&self.selectors.submit_button).await?;
        self.click(&self.selectors.submit_button).await
    }
}

// ========== 页面脚本 ==========

fn js_str(value: &str) -> String {
    // 序列化 &str 不会失败
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn clickable_script(selector: &str) -> String {
    format!(
        r#"
        (() => {{
            const el = document.querySelector({});
            if (!el) return false;
            const style = window.getComputedStyle(el);
            const rect = el.getBoundingClientRect();
            return !el.disabled
                && style.display !== 'none'
                && style.visibility !== 'hidden'
                && rect.width > 0
                && rect.height > 0;
        }})()
        "#,
        js_str(selector)
    )
}

fn click_script(selector: &str) -> String {
    format!(
        r#"
        (() => {{
            const el = document.querySelector({});
            if (!el) return false;
            el.click();
            return true;
        }})()
        "#,
        js_str(selector)
    )
}

fn extract_script(container_id: &str, text_selector: &str, option_selector: &str) -> String {
    format!(
        r#"
        (() => {{
            const root = document.getElementById({});
            if (!root) return null;
            const title = root.querySelector({});
            if (!title) return null;
            const read = (el) => (el.innerText || el.textContent || '').trim();
            const options = Array.from(root.querySelectorAll({})).map(read);
            return {{ text: read(title), options }};
        }})()
        "#,
        js_str(container_id),
        js_str(text_selector),
        js_str(option_selector)
    )
}

/// 只在选项元素中查找：先找去空白后完全相同的，再退而求其次找包含的
fn activate_script(container_id: &str, option_selector: &str, option: &str) -> String {
    format!(
        r#"
        (() => {{
            const root = document.getElementById({});
            if (!root) return false;
            const norm = (s) => (s || '').replace(/\s+/g, '');
            const want = norm({});
            if (!want) return false;
            const choices = Array.from(root.querySelectorAll({}));
            const text = (el) => norm(el.innerText || el.textContent);
            const hit = choices.find((c) => text(c) === want)
                || choices.find((c) => text(c).includes(want));
            if (!hit) return false;
            hit.click();
            return true;
        }})()
        "#,
        js_str(container_id),
        js_str(option),
        js_str(option_selector)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_escape_strings() {
        let script = activate_script("div_q_3", ".form-check-label", r#"他說 "不要" 'ok'"#);
        assert!(script.contains(r#"document.getElementById("div_q_3")"#));
        assert!(script.contains(r#"norm("他說 \"不要\" 'ok'")"#));
    }

    #[test]
    fn test_extract_script_uses_selectors() {
        let script = extract_script("div_q_1", "h4", ".form-check-label");
        assert!(script.contains(r#"getElementById("div_q_1")"#));
        assert!(script.contains(r#"querySelector("h4")"#));
        assert!(script.contains(r#"querySelectorAll(".form-check-label")"#));
    }

    #[test]
    fn test_activate_script_uses_option_selector() {
        let script = activate_script("div_q_2", "span.opt", "(1) 是");
        assert!(script.contains(r#"querySelectorAll("span.opt")"#));
        assert!(script.contains(r#"norm("(1) 是")"#));
        assert!(!script.contains("querySelectorAll('label')"));
    }

    #[test]
    fn test_click_scripts_target_selector() {
        assert!(click_script(".btnSendExam").contains(r#"querySelector(".btnSendExam")"#));
        assert!(clickable_script(".btnStartExam").contains(r#"querySelector(".btnStartExam")"#));
    }
}
