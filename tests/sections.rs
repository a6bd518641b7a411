mod common;

use school_portal::models::sections::{
    entities::{SectionPlan, SectionSlot},
    requests::SectionListQuery,
};
use school_portal::services::sections::{
    SectionAssignError, assign_student_section, auto_assign_sections,
};

#[tokio::test]
async fn test_auto_assign_creates_sections_in_letter_order() {
    let storage = common::storage().await;
    for n in 1..=5 {
        common::student(&storage, &format!("2025-000{n}"), "IT", 1).await;
    }
    // 其他年级不受影响
    let other = common::student(&storage, "2025-1000", "IT", 2).await;

    let result = auto_assign_sections(&storage, "IT", 1, 2).await.unwrap();

    assert_eq!(result.assigned, 5);
    assert_eq!(result.created_sections, vec!["IT 1A", "IT 1B", "IT 1C"]);
    let occupants: Vec<i64> = result.sections.iter().map(|s| s.occupants).collect();
    assert_eq!(occupants, vec![2, 2, 1]);
    assert!(result.sections.iter().all(|s| s.capacity == 2));

    let other = storage.get_student_by_id(other.id).await.unwrap().unwrap();
    assert_eq!(other.section_id, None);
}

#[tokio::test]
async fn test_auto_assign_fills_existing_sections_first() {
    let storage = common::storage().await;
    for n in 1..=3 {
        common::student(&storage, &format!("2025-000{n}"), "IT", 1).await;
    }
    auto_assign_sections(&storage, "IT", 1, 2).await.unwrap();

    // 1B 还有一个空位
    for n in 4..=6 {
        common::student(&storage, &format!("2025-000{n}"), "IT", 1).await;
    }
    let result = auto_assign_sections(&storage, "IT", 1, 2).await.unwrap();

    assert_eq!(result.assigned, 3);
    assert_eq!(result.created_sections, vec!["IT 1C"]);
    let occupants: Vec<(String, i64)> = result
        .sections
        .iter()
        .map(|s| (s.section.name.clone(), s.occupants))
        .collect();
    assert_eq!(
        occupants,
        vec![
            ("A".to_string(), 2),
            ("B".to_string(), 2),
            ("C".to_string(), 2)
        ]
    );
}

#[tokio::test]
async fn test_auto_assign_without_pending_students_is_noop() {
    let storage = common::storage().await;
    common::student(&storage, "2025-0001", "IT", 1).await;
    auto_assign_sections(&storage, "IT", 1, 40).await.unwrap();

    let result = auto_assign_sections(&storage, "IT", 1, 40).await.unwrap();
    assert_eq!(result.assigned, 0);
    assert!(result.created_sections.is_empty());
    assert_eq!(result.sections.len(), 1);
    assert_eq!(storage.count_sections().await.unwrap(), 1);
}

#[tokio::test]
async fn test_manual_assign_checks_program_and_capacity() {
    let storage = common::storage().await;
    let first = common::student(&storage, "2025-0001", "IT", 1).await;
    auto_assign_sections(&storage, "IT", 1, 1).await.unwrap();
    let section_a = storage
        .list_sections_with_occupancy(SectionListQuery {
            program: Some("IT".to_string()),
            year_level: Some(1),
        })
        .await
        .unwrap()
        .remove(0)
        .0;

    let second = common::student(&storage, "2025-0002", "IT", 1).await;
    let err = assign_student_section(&storage, second.id, Some(section_a.id), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, SectionAssignError::Full { capacity: 1 }));

    let senior = common::student(&storage, "2022-0001", "IT", 4).await;
    let err = assign_student_section(&storage, senior.id, Some(section_a.id), 40)
        .await
        .unwrap_err();
    assert!(matches!(err, SectionAssignError::Mismatch));

    let err = assign_student_section(&storage, second.id, Some(9999), 40)
        .await
        .unwrap_err();
    assert!(matches!(err, SectionAssignError::SectionNotFound));

    // 重复分配到同一班级不受容量限制
    let same = assign_student_section(&storage, first.id, Some(section_a.id), 1)
        .await
        .unwrap();
    assert_eq!(same.section_id, Some(section_a.id));
}

#[tokio::test]
async fn test_manual_unassign_frees_a_seat() {
    let storage = common::storage().await;
    let first = common::student(&storage, "2025-0001", "IT", 1).await;
    let second = common::student(&storage, "2025-0002", "IT", 1).await;
    auto_assign_sections(&storage, "IT", 1, 2).await.unwrap();
    let section_id = storage
        .get_student_by_id(first.id)
        .await
        .unwrap()
        .unwrap()
        .section_id
        .unwrap();

    let removed = assign_student_section(&storage, second.id, None, 2)
        .await
        .unwrap();
    assert_eq!(removed.section_id, None);
    assert_eq!(storage.count_section_occupants(section_id).await.unwrap(), 1);
    assert_eq!(storage.count_unassigned_students().await.unwrap(), 1);

    let err = assign_student_section(&storage, 9999, None, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, SectionAssignError::StudentNotFound));
}

#[tokio::test]
async fn test_stale_plan_is_rolled_back_entirely() {
    let storage = common::storage().await;
    let first = common::student(&storage, "2025-0001", "IT", 1).await;
    let second = common::student(&storage, "2025-0002", "IT", 1).await;

    let current = SectionPlan {
        assignments: vec![(second.id, SectionSlot::New(0))],
        new_sections: vec!["A".to_string()],
    };
    storage.apply_section_plan("IT", 1, &current).await.unwrap();

    // 方案生成时 second 仍未分班
    let stale = SectionPlan {
        assignments: vec![
            (first.id, SectionSlot::New(0)),
            (second.id, SectionSlot::New(0)),
        ],
        new_sections: vec!["B".to_string()],
    };
    assert!(storage.apply_section_plan("IT", 1, &stale).await.is_err());

    let sections = storage
        .list_sections_with_occupancy(SectionListQuery {
            program: Some("IT".to_string()),
            year_level: Some(1),
        })
        .await
        .unwrap();
    let names: Vec<&str> = sections.iter().map(|(s, _)| s.name.as_str()).collect();
    assert_eq!(names, vec!["A"]);
    assert_eq!(sections[0].1, 1);

    let first = storage.get_student_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(first.section_id, None);
    let second = storage.get_student_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(second.section_id, Some(sections[0].0.id));
}
