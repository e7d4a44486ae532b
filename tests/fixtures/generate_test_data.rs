// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成示例课程目录 (CSV + SQLite) 与要求集 JSON
// 输出: tests/fixtures/datasets/
// ==========================================

use csv::Writer;
use degree_planner::{
    CatalogStore, Course, GroupMember, RequirementGroup, RequirementSet, TargetCount,
    Term,
};
use std::error::Error;
use std::fs;
use std::path::Path;

const OUT_DIR: &str = "tests/fixtures/datasets";

fn course(
    code: &str,
    title: &str,
    credits: f64,
    terms: &[Term],
    is_foundation: bool,
    difficulty_weight: f64,
) -> Course {
    Course {
        code: code.to_string(),
        title: title.to_string(),
        credits,
        terms_offered: terms.iter().copied().collect(),
        is_foundation,
        difficulty_weight,
    }
}

fn sample_courses() -> Vec<Course> {
    const ALL: &[Term] = &[Term::Fall, Term::Spring, Term::Summer];
    const FS: &[Term] = &[Term::Fall, Term::Spring];
    vec![
        course("CS 18000", "Problem Solving And OOP", 4.0, ALL, true, 3.8),
        course("CS 18200", "Foundations Of CS", 3.0, ALL, true, 3.5),
        course("CS 24000", "Programming In C", 3.0, ALL, true, 3.2),
        course("CS 25000", "Computer Architecture", 4.0, ALL, true, 3.6),
        course("CS 25100", "Data Structures And Algorithms", 3.0, ALL, true, 4.2),
        course("CS 25200", "Systems Programming", 4.0, FS, true, 4.0),
        course("MA 16100", "Calculus I", 5.0, ALL, false, 3.0),
        course("MA 16200", "Calculus II", 5.0, ALL, false, 3.1),
        course("MA 26100", "Multivariate Calculus", 4.0, FS, false, 3.3),
        course("MA 26500", "Linear Algebra", 3.0, FS, false, 3.2),
        course("STAT 35000", "Introduction To Statistics", 3.0, FS, false, 2.8),
        course("CS 35100", "Cloud Computing", 3.0, FS, false, 3.0),
        course("CS 38100", "Introduction To Algorithms", 3.0, FS, false, 4.1),
        course("CS 37300", "Data Mining And Machine Learning", 3.0, FS, false, 3.7),
        course("CS 47100", "Artificial Intelligence", 3.0, &[Term::Fall], false, 3.9),
        course("CS 47300", "Web Information Search", 3.0, &[Term::Spring], false, 3.4),
        course("STAT 41600", "Probability", 3.0, FS, false, 3.5),
        course("MA 41600", "Probability", 3.0, FS, false, 3.5),
        course("STAT 51200", "Applied Regression Analysis", 3.0, FS, false, 3.3),
        course("CS 31100", "Competitive Programming II", 2.0, FS, false, 2.5),
        course("CS 34800", "Information Systems", 3.0, FS, false, 2.9),
        course("CS 43900", "Introduction To Data Visualization", 3.0, FS, false, 2.9),
        course("CS 44000", "Large Scale Data Analytics", 3.0, FS, false, 3.0),
        course("CS 45600", "Programming Languages", 3.0, FS, false, 3.2),
        course("CS 47500", "Human-Computer Interaction", 3.0, FS, false, 3.1),
    ]
}

fn sample_edges() -> Vec<(&'static str, &'static str)> {
    vec![
        ("CS 18200", "CS 18000"),
        ("CS 18200", "MA 16100"),
        ("CS 24000", "CS 18000"),
        ("CS 25000", "CS 18200"),
        ("CS 25000", "CS 24000"),
        ("CS 25100", "CS 18200"),
        ("CS 25100", "CS 24000"),
        ("CS 25200", "CS 25000"),
        ("CS 25200", "CS 25100"),
        ("MA 16200", "MA 16100"),
        ("MA 26100", "MA 16200"),
        ("MA 26500", "MA 16200"),
        ("STAT 35000", "MA 16200"),
        ("CS 35100", "CS 25200"),
        ("CS 38100", "CS 25100"),
        ("CS 37300", "CS 25100"),
        ("CS 37300", "STAT 35000"),
        ("CS 47100", "CS 37300"),
        ("CS 47300", "CS 37300"),
        ("STAT 41600", "STAT 35000"),
        ("STAT 41600", "MA 26100"),
        ("MA 41600", "STAT 35000"),
        ("MA 41600", "MA 26100"),
        ("STAT 51200", "STAT 35000"),
        ("CS 31100", "CS 18000"),
        ("CS 34800", "CS 25100"),
        ("CS 43900", "CS 25100"),
        ("CS 44000", "CS 25100"),
        ("CS 45600", "CS 25200"),
        ("CS 47500", "CS 25100"),
    ]
}

fn mi_requirement_set() -> RequirementSet {
    RequirementSet {
        track_id: "machine_intelligence".to_string(),
        title: "BS Computer Science - Machine Intelligence".to_string(),
        groups: vec![
            RequirementGroup::compulsory(
                "core-foundation",
                &[
                    "CS 18000", "CS 18200", "CS 24000", "CS 25000", "CS 25100",
                    "CS 25200",
                ],
            ),
            RequirementGroup::compulsory(
                "core-math",
                &["MA 16100", "MA 16200", "MA 26100", "MA 26500", "STAT 35000"],
            ),
            RequirementGroup::compulsory("core-intermediate", &["CS 35100"]),
            RequirementGroup::compulsory("mi-required", &["CS 37300", "CS 38100"]),
            RequirementGroup::choose_n("mi-ai", 1, &["CS 47100", "CS 47300"]),
            RequirementGroup::choose_n(
                "mi-stats",
                1,
                &["STAT 41600", "MA 41600", "STAT 51200"],
            ),
            RequirementGroup {
                group_id: "mi-electives".to_string(),
                kind: degree_planner::GroupKind::ChooseN,
                members: vec![
                    GroupMember::Course("CS 31100".to_string()),
                    GroupMember::Course("CS 34800".to_string()),
                    GroupMember::Course("CS 45600".to_string()),
                    GroupMember::Subgroup(RequirementGroup::exclusive_subgroup(
                        "mi-data-viz",
                        &["CS 43900", "CS 44000", "CS 47500"],
                    )),
                ],
                required_count: 2,
            },
        ],
        target: TargetCount::Courses(18),
    }
}

fn write_courses_csv(courses: &[Course], path: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record([
        "code",
        "title",
        "credits",
        "terms_offered",
        "is_foundation",
        "difficulty_weight",
    ])?;
    for course in courses {
        let terms = course
            .terms_offered
            .iter()
            .map(|t| t.to_db_str())
            .collect::<Vec<_>>()
            .join("|");
        writer.write_record(&[
            course.code.clone(),
            course.title.clone(),
            course.credits.to_string(),
            terms,
            course.is_foundation.to_string(),
            course.difficulty_weight.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_prereqs_csv(
    edges: &[(&str, &str)],
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["course", "prereq"])?;
    for (course, prereq) in edges {
        writer.write_record([*course, *prereq])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_sqlite(
    courses: &[Course],
    edges: &[(&str, &str)],
    set: &RequirementSet,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let db_path = path.to_str().ok_or("无效数据库路径")?;
    let store = CatalogStore::open(db_path)?;
    store.init_schema()?;
    for course in courses {
        store.insert_course(course)?;
    }
    for (course, prereq) in edges {
        store.insert_prereq_edge(course, prereq)?;
    }
    store.insert_requirement_set(set)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let out_dir = Path::new(OUT_DIR);
    fs::create_dir_all(out_dir)?;

    let courses = sample_courses();
    let edges = sample_edges();
    let mi = mi_requirement_set();

    write_courses_csv(&courses, &out_dir.join("courses.csv"))?;
    write_prereqs_csv(&edges, &out_dir.join("prereqs.csv"))?;
    fs::write(
        out_dir.join("machine_intelligence.json"),
        serde_json::to_string_pretty(&mi)?,
    )?;

    let db_path = out_dir.join("catalog.db");
    if db_path.exists() {
        fs::remove_file(&db_path)?;
    }
    write_sqlite(&courses, &edges, &mi, &db_path)?;

    println!("生成完成: {}", out_dir.display());
    println!("  - courses.csv ({} 门课程)", courses.len());
    println!("  - prereqs.csv ({} 条先修边)", edges.len());
    println!("  - machine_intelligence.json");
    println!("  - catalog.db");
    Ok(())
}
