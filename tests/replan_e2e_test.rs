// ==========================================
// 挂科重规划端到端测试
// ==========================================
// 性质: 历史前缀不动 / 原方案不被修改 /
//       延期由重调度自然导出 (可为零) /
//       无效挂科事件一律拒绝
// ==========================================


use degree_planner::{
    CustomizationNote, FailureEvent, PlanWarning, PlanningError, Term, TermSlot,
};
use test_helpers::*;

/// 临近毕业的 MI 学生: 只剩 CS 38100 / AI 选修 / 两门方向选修
fn senior_profile() -> degree_planner::StudentProfile {
    let mut profile = freshman_profile();
    profile.current_term = TermSlot::new(2026, Term::Spring);
    profile.completed_courses = completed(&[
        "CS 18000", "CS 18200", "CS 24000", "CS 25000", "CS 25100", "CS 25200",
        "MA 16100", "MA 16200", "MA 26100", "MA 26500", "STAT 35000", "CS 35100",
        "CS 37300", "MA 41600",
    ]);
    profile
}

// ==========================================
// 场景: 零后继课程挂科被既有缓冲完全吸收
// ==========================================
#[test]
fn test_failure_absorbed_by_slack() {
    let api = planning_api();
    let requirements = mi_degree_requirements();
    let profile = senior_profile();

    let original = api.generate_plan(&profile, &requirements).expect("plan");
    // 预期形态: Spring 2026 排 CS 38100/CS 31100/CS 34800,
    // Fall 2026 只排秋季限定的 CS 47100 (存在大量缓冲)
    assert_eq!(original.graduation_term, TermSlot::new(2026, Term::Fall));
    let failed_slot = original
        .semester_of("CS 34800")
        .expect("CS 34800 scheduled")
        .slot;
    assert_eq!(failed_slot, TermSlot::new(2026, Term::Spring));

    let event = FailureEvent {
        course: "CS 34800".to_string(),
        term_failed: failed_slot,
        attempt_number: 1,
    };
    let replanned = api.replan(&original, &event, &requirements).expect("replan");

    // CS 34800 无后继课程且秋季尚有缓冲: 毕业学期不变
    assert_eq!(replanned.graduation_term, original.graduation_term);
    // 重修落在挂科后的学期
    let retake_slot = replanned
        .semesters
        .iter()
        .filter(|s| s.slot > failed_slot)
        .find(|s| s.contains("CS 34800"))
        .expect("retake scheduled")
        .slot;
    assert!(retake_slot > failed_slot);
}

// ==========================================
// 场景: 关键基础课挂科产生级联延期
// ==========================================
#[test]
fn test_foundation_failure_derives_delay() {
    let api = planning_api();
    let requirements = mi_degree_requirements();

    let original = api
        .generate_plan(&freshman_profile(), &requirements)
        .expect("plan");
    let failed_slot = original
        .semester_of("CS 25100")
        .expect("CS 25100 scheduled")
        .slot;

    let event = FailureEvent {
        course: "CS 25100".to_string(),
        term_failed: failed_slot,
        attempt_number: 1,
    };
    let replanned = api.replan(&original, &event, &requirements).expect("replan");

    // 数据结构课挡住全部上层课程, 毕业必然推迟
    assert!(replanned.graduation_term > original.graduation_term);

    // 重修不得落在挂科学期本身
    let retake = replanned
        .semesters
        .iter()
        .filter(|s| s.contains("CS 25100"))
        .map(|s| s.slot)
        .max()
        .expect("retake scheduled");
    assert!(retake > failed_slot);

    // 后继课程全部排在重修之后
    for dependent in ["CS 25200", "CS 38100", "CS 37300"] {
        let slot = replanned
            .semesters
            .iter()
            .filter(|s| s.slot > failed_slot)
            .find(|s| s.contains(dependent))
            .unwrap_or_else(|| panic!("{} not rescheduled", dependent))
            .slot;
        assert!(slot > retake, "{} scheduled before retake", dependent);
    }
}

// ==========================================
// 性质: 历史前缀保持逐字节不变, 原方案不被修改
// ==========================================
#[test]
fn test_prefix_fixed_and_original_untouched() {
    let api = planning_api();
    let requirements = mi_degree_requirements();
    let profile = senior_profile();

    let original = api.generate_plan(&profile, &requirements).expect("plan");
    let original_snapshot =
        serde_json::to_string(&original).expect("serialize original");

    let failed_slot = original.semester_of("CS 34800").expect("scheduled").slot;
    let event = FailureEvent {
        course: "CS 34800".to_string(),
        term_failed: failed_slot,
        attempt_number: 1,
    };
    let replanned = api.replan(&original, &event, &requirements).expect("replan");

    // 前缀 (含挂科学期) 原样保留, 挂科的那次修读仍留在历史里
    let prefix_len = original
        .semesters
        .iter()
        .filter(|s| s.slot <= failed_slot)
        .count();
    for idx in 0..prefix_len {
        assert_eq!(replanned.semesters[idx], original.semesters[idx]);
    }

    // 原方案逐字节不变
    let after = serde_json::to_string(&original).expect("serialize again");
    assert_eq!(original_snapshot, after);

    // 重规划痕迹记录在案
    assert!(replanned.customization_notes.iter().any(|n| matches!(
        n,
        CustomizationNote::ReplannedAfterFailure { course, .. } if course == "CS 34800"
    )));
}

// ==========================================
// 场景: 对并未排在所述学期的课程发起重规划 -> 拒绝
// ==========================================
#[test]
fn test_noop_failure_event_rejected() {
    let api = planning_api();
    let requirements = mi_degree_requirements();
    let profile = senior_profile();
    let original = api.generate_plan(&profile, &requirements).expect("plan");

    // CS 47100 排在秋季, 却声称春季挂科
    let event = FailureEvent {
        course: "CS 47100".to_string(),
        term_failed: TermSlot::new(2026, Term::Spring),
        attempt_number: 1,
    };
    let result = api.replan(&original, &event, &requirements);
    assert!(matches!(
        result,
        Err(PlanningError::InvalidFailureEvent { .. })
    ));

    // 完全没排过的课程同样拒绝
    let event = FailureEvent {
        course: "CS 42600".to_string(),
        term_failed: TermSlot::new(2026, Term::Spring),
        attempt_number: 1,
    };
    let result = api.replan(&original, &event, &requirements);
    assert!(matches!(
        result,
        Err(PlanningError::InvalidFailureEvent { .. })
    ));
}

// ==========================================
// 场景: 低 GPA 与多次重修的风险标签
// ==========================================
#[test]
fn test_retake_risk_warnings() {
    let api = planning_api();
    let requirements = mi_degree_requirements();
    let mut profile = senior_profile();
    profile.gpa = Some(2.1);

    let original = api.generate_plan(&profile, &requirements).expect("plan");
    let failed_slot = original.semester_of("CS 34800").expect("scheduled").slot;

    let event = FailureEvent {
        course: "CS 34800".to_string(),
        term_failed: failed_slot,
        attempt_number: 2,
    };
    let replanned = api.replan(&original, &event, &requirements).expect("replan");

    assert!(replanned
        .warnings
        .iter()
        .any(|w| matches!(w, PlanWarning::LowGpaRetakeRisk { .. })));
    assert!(replanned.warnings.iter().any(|w| matches!(
        w,
        PlanWarning::RepeatedAttempt { course, attempt_number: 2 } if course == "CS 34800"
    )));
}

// ==========================================
// 性质: 重规划结果仍满足先修顺序不变量
// ==========================================
#[test]
fn test_replanned_plan_keeps_ordering_invariant() {
    let api = planning_api();
    let catalog = purdue_catalog();
    let graph = purdue_graph(&catalog);
    let requirements = mi_degree_requirements();

    let original = api
        .generate_plan(&freshman_profile(), &requirements)
        .expect("plan");
    let failed_slot = original.semester_of("CS 25100").expect("scheduled").slot;
    let event = FailureEvent {
        course: "CS 25100".to_string(),
        term_failed: failed_slot,
        attempt_number: 1,
    };
    let replanned = api.replan(&original, &event, &requirements).expect("replan");

    // 挂科课程只从"可用集合"里剔除那一次失败的修读;
    // 历史前缀里的其他课程照常计入
    let mut available = replanned.profile.completed_courses.clone();
    for semester in &replanned.semesters {
        for course in &semester.courses {
            if semester.slot > failed_slot {
                assert!(
                    graph.is_satisfied(course, &available),
                    "{} at {} missing prerequisites",
                    course,
                    semester.slot
                );
            }
        }
        for course in &semester.courses {
            if !(semester.slot == failed_slot && course == "CS 25100") {
                available.insert(course.clone());
            }
        }
    }
}
