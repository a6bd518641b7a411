//! 自动分班方案
//!
//! 单遍贪心的首次适应：已有班级按名称顺序依次填满，全部满员时按字母顺序开新班。
//! 不会调整已分班学生。

use std::collections::HashSet;

use super::naming::{SECTION_NAME_COUNT, next_section_name};
use crate::errors::{PortalError, Result};
use crate::models::sections::entities::{SectionOccupancy, SectionPlan, SectionSlot};

struct Slot {
    target: SectionSlot,
    occupants: i64,
}

/// 为未分班学生生成分班方案
///
/// 任何班级在方案执行后都不会超过 `capacity` 人；
/// 26 个字母全部用完仍有学生未分配时返回 `SectionCapacityExhausted`。
pub fn plan_section_assignment(
    existing: &[SectionOccupancy],
    students: &[i64],
    capacity: i64,
) -> Result<SectionPlan> {
    if capacity <= 0 {
        return Err(PortalError::validation(format!(
            "Section capacity must be positive, got {capacity}"
        )));
    }

    let mut ordered: Vec<&SectionOccupancy> = existing.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let mut used_names: HashSet<String> = ordered.iter().map(|s| s.name.clone()).collect();
    let mut greatest_name = ordered.last().map(|s| s.name.clone()).unwrap_or_default();

    let mut slots: Vec<Slot> = ordered
        .iter()
        .map(|s| Slot {
            target: SectionSlot::Existing(s.section_id),
            occupants: s.occupants,
        })
        .collect();

    let mut plan = SectionPlan::default();
    // 人数只增不减，已满的班级之后不会再有空位
    let mut cursor = 0;

    for &student_id in students {
        while cursor < slots.len() && slots[cursor].occupants >= capacity {
            cursor += 1;
        }

        if cursor == slots.len() {
            let name = next_free_name(&greatest_name, &used_names).ok_or_else(|| {
                PortalError::section_capacity_exhausted(format!(
                    "All {SECTION_NAME_COUNT} section names are full; {} student(s) left unassigned",
                    students.len() - plan.assignments.len()
                ))
            })?;

            used_names.insert(name.clone());
            greatest_name = name.clone();
            slots.push(Slot {
                target: SectionSlot::New(plan.new_sections.len()),
                occupants: 0,
            });
            plan.new_sections.push(name);
        }

        let slot = &mut slots[cursor];
        slot.occupants += 1;
        plan.assignments.push((student_id, slot.target));
    }

    Ok(plan)
}

// 从 `after` 开始按字母顺序找第一个未使用的名称
fn next_free_name(after: &str, used: &HashSet<String>) -> Option<String> {
    let mut candidate = next_section_name(after);
    for _ in 0..SECTION_NAME_COUNT {
        if !used.contains(&candidate) {
            return Some(candidate);
        }
        candidate = next_section_name(&candidate);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn occupancy(section_id: i64, name: &str, occupants: i64) -> SectionOccupancy {
        SectionOccupancy {
            section_id,
            name: name.to_string(),
            occupants,
        }
    }

    fn students(n: i64) -> Vec<i64> {
        (1..=n).collect()
    }

    // 方案执行后每个班级的人数
    fn final_counts(existing: &[SectionOccupancy], plan: &SectionPlan) -> HashMap<SectionSlot, i64> {
        let mut counts: HashMap<SectionSlot, i64> = existing
            .iter()
            .map(|s| (SectionSlot::Existing(s.section_id), s.occupants))
            .collect();
        for (_, slot) in &plan.assignments {
            *counts.entry(*slot).or_default() += 1;
        }
        counts
    }

    #[test]
    fn test_opens_sections_in_order_when_none_exist() {
        let plan = plan_section_assignment(&[], &students(85), 40).unwrap();

        assert_eq!(plan.new_sections, vec!["A", "B", "C"]);
        let counts = final_counts(&[], &plan);
        assert_eq!(counts[&SectionSlot::New(0)], 40);
        assert_eq!(counts[&SectionSlot::New(1)], 40);
        assert_eq!(counts[&SectionSlot::New(2)], 5);
    }

    #[test]
    fn test_fills_existing_sections_by_name_first() {
        // 输入顺序打乱，仍按名称 A、B 的顺序填充
        let existing = vec![occupancy(20, "B", 10), occupancy(10, "A", 38)];
        let plan = plan_section_assignment(&existing, &students(5), 40).unwrap();

        assert!(plan.new_sections.is_empty());
        assert_eq!(plan.assignments[0], (1, SectionSlot::Existing(10)));
        assert_eq!(plan.assignments[1], (2, SectionSlot::Existing(10)));
        assert_eq!(plan.assignments[2], (3, SectionSlot::Existing(20)));
        assert_eq!(plan.assignments[4], (5, SectionSlot::Existing(20)));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let cases: Vec<(Vec<SectionOccupancy>, i64, i64)> = vec![
            (vec![], 1, 40),
            (vec![occupancy(1, "A", 40)], 41, 40),
            (vec![occupancy(1, "A", 39), occupancy(2, "B", 0)], 100, 40),
            (vec![occupancy(1, "A", 3)], 17, 3),
            // 容量调低后已超员的班级保持原样，不再分入
            (vec![occupancy(1, "A", 45)], 10, 40),
        ];

        for (existing, n, capacity) in cases {
            let plan = plan_section_assignment(&existing, &students(n), capacity).unwrap();
            assert_eq!(plan.assignments.len() as i64, n);
            for (slot, count) in final_counts(&existing, &plan) {
                if plan.assignments.iter().any(|(_, s)| *s == slot) {
                    assert!(count <= capacity, "{slot:?} has {count} > {capacity}");
                }
            }
        }
    }

    #[test]
    fn test_new_section_follows_greatest_name_and_skips_used() {
        let existing = vec![occupancy(1, "A", 40), occupancy(3, "C", 40)];
        let plan = plan_section_assignment(&existing, &students(1), 40).unwrap();
        assert_eq!(plan.new_sections, vec!["D"]);

        // Z 之后回绕到 A，跳过已使用的名称
        let existing = vec![occupancy(1, "A", 40), occupancy(26, "Z", 40)];
        let plan = plan_section_assignment(&existing, &students(1), 40).unwrap();
        assert_eq!(plan.new_sections, vec!["B"]);
    }

    #[test]
    fn test_exhausts_after_twenty_six_sections() {
        let plan = plan_section_assignment(&[], &students(26 * 2), 2).unwrap();
        assert_eq!(plan.new_sections.len(), 26);
        assert_eq!(plan.new_sections.last().map(String::as_str), Some("Z"));

        let err = plan_section_assignment(&[], &students(26 * 2 + 1), 2).unwrap_err();
        assert_eq!(err.code(), "E012");
    }

    #[test]
    fn test_empty_inputs() {
        let plan = plan_section_assignment(&[occupancy(1, "A", 0)], &[], 40).unwrap();
        assert_eq!(plan, SectionPlan::default());

        assert!(plan_section_assignment(&[], &students(1), 0).is_err());
    }
}
