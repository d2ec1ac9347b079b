use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use take_exam_submit::clients::ExamClient;
use take_exam_submit::config::Config;
use take_exam_submit::infrastructure::TerminalFullscreen;
use take_exam_submit::models::exam::ExamDefinition;
use take_exam_submit::models::violation::ViolationKind;
use take_exam_submit::orchestrator::{SessionHandle, SessionRunner};
use take_exam_submit::services::ExamLoader;
use take_exam_submit::session::{SessionPhase, SessionView};
use take_exam_submit::utils::html::{extract_img_urls, strip_tags};
use take_exam_submit::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::init_log_file(&config.output_log_file)?;
    logging::log_startup(&config);

    // 加载试卷
    let client = Arc::new(ExamClient::new(&config));
    let loader = ExamLoader::new(Arc::clone(&client));
    let exam = match &config.exam_file {
        Some(path) => loader.load_from_file(path).await?,
        None => loader
            .load(&config.exam_id)
            .await
            .context("试卷加载失败，会话无法开始")?,
    };

    // 展示层保留一份试卷用于渲染
    let exam_for_ui = exam.clone();

    // 启动会话
    let fullscreen = Box::new(TerminalFullscreen::new());
    let (runner, handle) = SessionRunner::new(exam, Arc::clone(&client), fullscreen, &config);
    let runner_task = tokio::spawn(runner.run());

    // 终端交互循环
    let quit = drive_terminal(handle, &exam_for_ui).await;
    if quit {
        runner_task.abort();
        warn!("🚪 已放弃本次会话");
        return Ok(());
    }

    let final_view = runner_task.await.context("会话运行器异常退出")?;
    logging::print_final_summary(&final_view, &config.output_log_file);
    Ok(())
}

/// 终端交互循环，返回用户是否主动放弃
async fn drive_terminal(mut handle: SessionHandle, exam: &ExamDefinition) -> bool {
    print_help();
    render_question(&handle.view(), exam);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut last_fingerprint = fingerprint(&handle.view());

    loop {
        tokio::select! {
            changed = handle.changed() => {
                if changed.is_err() {
                    return false;
                }
                let view = handle.view();
                let current = fingerprint(&view);
                if current != last_fingerprint {
                    last_fingerprint = current;
                    render_question(&view, exam);
                } else if view.remaining_secs > 0 && view.remaining_secs % 60 == 0 {
                    // 整分钟提醒一次，避免每秒刷屏
                    info!("{}", view.progress_line());
                }
                if view.phase.is_terminal() {
                    return false;
                }
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(input)) => {
                        if !dispatch(&handle, exam, input.trim()).await {
                            return true;
                        }
                    }
                    // stdin 关闭后只剩观察，等会话自己走到终态
                    _ => {
                        wait_for_terminal(&mut handle).await;
                        return false;
                    }
                }
            }
        }
    }
}

/// 决定是否需要整块重绘的视图指纹
fn fingerprint(view: &SessionView) -> (usize, SessionPhase, Vec<String>, u32, Option<String>) {
    (
        view.current_index,
        view.phase,
        view.selected
            .get(view.current_index)
            .cloned()
            .unwrap_or_default(),
        view.violation_count,
        view.last_submit_error.clone(),
    )
}

async fn wait_for_terminal(handle: &mut SessionHandle) {
    loop {
        if handle.view().phase.is_terminal() {
            return;
        }
        if handle.changed().await.is_err() {
            return;
        }
    }
}

/// 解析并派发一条终端命令，返回 false 表示用户要退出
async fn dispatch(handle: &SessionHandle, exam: &ExamDefinition, input: &str) -> bool {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or("");
    match command {
        "" => {}
        "unlock" => {
            let password = parts.next().unwrap_or("");
            handle.unlock(password).await;
        }
        "a" | "answer" => {
            let view = handle.view();
            match parts.next() {
                Some(letter) => match resolve_choice(exam, view.current_index, letter) {
                    Some((question_id, choice_id)) => handle.select(question_id, choice_id).await,
                    None => warn!("⚠️ 当前题没有选项 {}", letter),
                },
                None => warn!("用法: a <选项字母>"),
            }
        }
        "goto" => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n >= 1 => handle.navigate(n - 1).await,
            _ => warn!("用法: goto <题号>"),
        },
        "next" | "n" => {
            let view = handle.view();
            handle.navigate(view.current_index + 1).await;
        }
        "prev" | "p" => {
            let view = handle.view();
            handle.navigate(view.current_index.saturating_sub(1)).await;
        }
        "submit" => handle.submit_now().await,
        "signal" => match parts.next().map(str::parse::<ViolationKind>) {
            Some(Ok(kind)) => handle.signal(kind).await,
            _ => warn!(
                "用法: signal <tab_switch|exit_fullscreen|copy_attempt|paste_attempt|context_menu>"
            ),
        },
        "status" => render_question(&handle.view(), exam),
        "help" => print_help(),
        "quit" | "q" => return false,
        other => warn!("未知命令: {}（输入 help 查看用法）", other),
    }
    true
}

/// 把选项字母解析成 (题目ID, 选项ID)
fn resolve_choice(exam: &ExamDefinition, index: usize, letter: &str) -> Option<(String, String)> {
    let question = exam.questions.get(index)?;
    let letter = letter.trim().to_ascii_uppercase();
    let mut chars = letter.chars();
    let first = chars.next()?;
    if chars.next().is_some() || !first.is_ascii_uppercase() {
        return None;
    }
    let position = (first as u8 - b'A') as usize;
    let choice = question.choices.get(position)?;
    Some((question.id.clone(), choice.id.clone()))
}

fn render_question(view: &SessionView, exam: &ExamDefinition) {
    info!("\n{}", "─".repeat(60));
    info!("《{}》 {}", view.exam_title, view.progress_line());

    if view.phase == SessionPhase::Locked {
        info!("🔒 输入 unlock <密码> 开始考试");
        return;
    }

    if let Some(question) = exam.questions.get(view.current_index) {
        let stem = strip_tags(&question.content);
        info!(
            "第 {}/{} 题 [{}] {}",
            view.current_index + 1,
            view.total_questions,
            question.kind.label(),
            logging::truncate_text(&stem, 120)
        );
        for url in extract_img_urls(&question.content) {
            info!("  🖼 {}", url);
        }
        let selected = view
            .selected
            .get(view.current_index)
            .cloned()
            .unwrap_or_default();
        for (i, choice) in question.choices.iter().enumerate() {
            let letter = (b'A' + i as u8) as char;
            let mark = if selected.iter().any(|id| id == &choice.id) {
                "✓"
            } else {
                " "
            };
            info!(
                "  [{}] {}. {}",
                mark,
                letter,
                logging::truncate_text(&strip_tags(&choice.content), 80)
            );
        }
    }

    if let Some(error) = &view.last_submit_error {
        warn!("❌ 交卷失败: {}（可输入 submit 重试）", error);
    }
    if view.phase.is_terminal() {
        if let Some(submission_id) = &view.submission_id {
            info!("🎉 考试结束，提交编号: {}", submission_id);
        }
    }
}

fn print_help() {
    info!("命令: unlock <密码> | a <选项字母> | goto <题号> | next | prev | submit | signal <类型> | status | help | quit");
}
