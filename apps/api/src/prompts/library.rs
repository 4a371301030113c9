// Prompt library for the plan/do/check/act assistant
//
// Flat templates use `{name}` placeholders. Role-structured templates render
// their system and human messages through plain functions of the parameters.

use super::template::{FlatTemplate, OptionalParam, RoleTemplate, Template};
use super::types::ParameterSet;

pub const SMART_GOAL: &str = "smartGoal";
pub const DECOMPOSE_GOAL: &str = "decomposeGoal";
pub const SUMMARIZE_PROGRESS: &str = "summarizeProgress";
pub const SUGGEST_IMPROVEMENT: &str = "suggestImprovement";
pub const ANALYZE_OBSTACLES: &str = "analyzeObstacles";
pub const GENERATE_CONTENT: &str = "generateContent";
pub const WEEKLY_REVIEW: &str = "weeklyReview";
pub const ACTION_PLAN: &str = "actionPlan";

/// Every template the assistant ships with
pub fn all() -> Vec<(&'static str, Template)> {
    vec![
        (SMART_GOAL, smart_goal()),
        (DECOMPOSE_GOAL, decompose_goal()),
        (SUMMARIZE_PROGRESS, summarize_progress()),
        (SUGGEST_IMPROVEMENT, suggest_improvement()),
        (ANALYZE_OBSTACLES, analyze_obstacles()),
        (GENERATE_CONTENT, generate_content()),
        (WEEKLY_REVIEW, weekly_review()),
        (ACTION_PLAN, action_plan()),
    ]
}

pub fn smart_goal() -> Template {
    Template::Flat(FlatTemplate::new(
        "你是一名目标管理教练。请把下面的想法改写成一个符合 SMART 原则的目标\
         （具体、可衡量、可实现、相关、有时限）。\n\n\
         想法：{input}\n\n\
         请输出：\n\
         1. SMART 目标（一句话）\n\
         2. 衡量指标\n\
         3. 截止时间建议",
    ))
}

pub fn decompose_goal() -> Template {
    Template::Flat(FlatTemplate::new(
        "请把下面的目标拆解为 3-7 个可执行的任务，按执行顺序排列。\n\n\
         目标：{goal}\n\n\
         每个任务包含：标题、简要说明、预计耗时。",
    ))
}

pub fn summarize_progress() -> Template {
    Template::Flat(FlatTemplate::new(
        "根据以下执行记录，总结目标的当前进展。\n\n\
         目标：{goal}\n\
         执行记录：{logs}\n\n\
         请指出已完成的部分、尚未完成的部分，并给出完成度的百分比估计。",
    ))
}

pub fn suggest_improvement() -> Template {
    Template::Flat(FlatTemplate::new(
        "你正在帮助用户完成 PDCA 循环中的 Act 阶段。\n\n\
         目标：{goal}\n\
         检查结果：{checkResult}\n\n\
         请给出 3 条具体的改进建议，并说明下一轮计划应如何调整。",
    ))
}

pub fn analyze_obstacles() -> Template {
    Template::Flat(FlatTemplate::new(
        "目标：{goal}\n\
         遇到的障碍：{obstacles}\n\n\
         请分析每个障碍的根本原因，并为每个障碍给出一个可立即执行的应对措施。",
    ))
}

const CONTENT_OPTIONAL: &[OptionalParam] = &[
    OptionalParam {
        name: "length",
        default: Some("中等"),
    },
    OptionalParam {
        name: "tone",
        default: Some("专业"),
    },
];

pub fn generate_content() -> Template {
    Template::RoleStructured(RoleTemplate {
        required: &["topic"],
        optional: CONTENT_OPTIONAL,
        system: content_system,
        human: content_human,
    })
}

fn content_system(params: &ParameterSet) -> String {
    format!(
        "你是一名写作助手，帮助用户围绕个人目标撰写内容。\
         篇幅：{}。语气：{}。只输出正文，不要添加额外说明。",
        params.text_or("length", "中等"),
        params.text_or("tone", "专业"),
    )
}

fn content_human(params: &ParameterSet) -> String {
    format!("主题：{}", params.text_or("topic", ""))
}

const REVIEW_OPTIONAL: &[OptionalParam] = &[OptionalParam {
    name: "period",
    default: Some("本周"),
}];

pub fn weekly_review() -> Template {
    Template::RoleStructured(RoleTemplate {
        required: &["goal", "progress"],
        optional: REVIEW_OPTIONAL,
        system: review_system,
        human: review_human,
    })
}

fn review_system(params: &ParameterSet) -> String {
    format!(
        "你是一名复盘教练。请针对{}的执行情况进行复盘，\
         输出：亮点、问题、下阶段的三个重点。",
        params.text_or("period", "本周"),
    )
}

fn review_human(params: &ParameterSet) -> String {
    format!(
        "目标：{}\n进展：{}",
        params.text_or("goal", ""),
        params.text_or("progress", ""),
    )
}

const PLAN_OPTIONAL: &[OptionalParam] = &[
    OptionalParam {
        name: "deadline",
        default: Some("未指定"),
    },
    OptionalParam {
        name: "tasks",
        default: None,
    },
];

pub fn action_plan() -> Template {
    Template::RoleStructured(RoleTemplate {
        required: &["goal"],
        optional: PLAN_OPTIONAL,
        system: plan_system,
        human: plan_human,
    })
}

fn plan_system(params: &ParameterSet) -> String {
    format!(
        "你是一名项目规划师。为用户的目标制定按周划分的行动计划，\
         截止时间：{}。每周列出具体行动和检查点。",
        params.text_or("deadline", "未指定"),
    )
}

fn plan_human(params: &ParameterSet) -> String {
    let goal = params.text_or("goal", "");
    match params.text("tasks") {
        Some(tasks) => format!("目标：{}\n已有任务：{}", goal, tasks),
        None => format!("目标：{}", goal),
    }
}
