use std::collections::HashMap;

use crate::models::{
    courses::entities::Course,
    enrollments::entities::{Enrollment, EnrollmentStatus},
    grades::entities::Grade,
    prospectus::responses::{CourseStatus, ProspectusEntry, ProspectusSummary},
};
use crate::services::grades::average::mean;

/// 按 (年级, 学期, 课程代码) 排列课程，并附上选课状态与成绩
pub fn build_entries(
    mut courses: Vec<Course>,
    enrollments: &[Enrollment],
    grades: &[Grade],
) -> Vec<ProspectusEntry> {
    courses.sort_by(|a, b| {
        (a.year_level, a.semester, &a.code).cmp(&(b.year_level, b.semester, &b.code))
    });

    let by_course: HashMap<i64, &Enrollment> =
        enrollments.iter().map(|e| (e.course_id, e)).collect();
    let by_enrollment: HashMap<i64, &Grade> =
        grades.iter().map(|g| (g.enrollment_id, g)).collect();

    courses
        .into_iter()
        .map(|course| {
            let enrollment = by_course.get(&course.id).copied();
            let grade = enrollment.and_then(|e| by_enrollment.get(&e.id).copied());

            let status = match enrollment.map(|e| e.status) {
                None => CourseStatus::NotTaken,
                Some(EnrollmentStatus::Enrolled) => CourseStatus::Enrolled,
                Some(EnrollmentStatus::Completed) => CourseStatus::Completed,
                Some(EnrollmentStatus::Dropped) => CourseStatus::Dropped,
            };

            ProspectusEntry {
                course,
                status,
                enrollment_id: enrollment.map(|e| e.id),
                school_year: enrollment.map(|e| e.school_year.clone()),
                prelim: grade.and_then(|g| g.prelim),
                midterm: grade.and_then(|g| g.midterm),
                final_grade: grade.and_then(|g| g.final_grade),
                average: grade.and_then(|g| g.average),
                remarks: grade.and_then(|g| g.remarks.clone()),
            }
        })
        .collect()
}

pub fn summarize(entries: &[ProspectusEntry]) -> ProspectusSummary {
    let count = |status: CourseStatus| entries.iter().filter(|e| e.status == status).count() as i64;

    ProspectusSummary {
        total_courses: entries.len() as i64,
        enrolled: count(CourseStatus::Enrolled),
        completed: count(CourseStatus::Completed),
        units_earned: entries
            .iter()
            .filter(|e| e.status == CourseStatus::Completed)
            .map(|e| i64::from(e.course.units))
            .sum(),
        general_average: mean(entries.iter().filter_map(|e| e.average)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::grades::average_grade;

    fn course(id: i64, code: &str, year_level: i32, semester: i32, units: i32) -> Course {
        Course {
            id,
            code: code.to_string(),
            title: format!("Course {code}"),
            units,
            program: "IT".to_string(),
            year_level,
            semester,
            teacher_id: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn enrollment(id: i64, course_id: i64, status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            id,
            student_id: 1,
            course_id,
            status,
            school_year: "2025-2026".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn grade(enrollment_id: i64, terms: [Option<f64>; 3]) -> Grade {
        Grade {
            id: enrollment_id * 10,
            enrollment_id,
            prelim: terms[0],
            midterm: terms[1],
            final_grade: terms[2],
            average: average_grade(terms[0], terms[1], terms[2]),
            remarks: None,
            graded_by: 99,
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_entries_are_ordered_and_marked_not_taken() {
        let courses = vec![
            course(1, "IT201", 2, 1, 3),
            course(2, "IT102", 1, 2, 3),
            course(3, "IT101", 1, 1, 3),
            course(4, "GE101", 1, 1, 2),
        ];
        let entries = build_entries(courses, &[], &[]);
        let codes: Vec<&str> = entries.iter().map(|e| e.course.code.as_str()).collect();
        assert_eq!(codes, vec!["GE101", "IT101", "IT102", "IT201"]);
        assert!(entries.iter().all(|e| e.status == CourseStatus::NotTaken));
        assert!(entries.iter().all(|e| e.average.is_none()));
    }

    #[test]
    fn test_summary_counts_units_and_general_average() {
        let courses = vec![
            course(1, "IT101", 1, 1, 3),
            course(2, "IT102", 1, 1, 4),
            course(3, "IT103", 1, 2, 3),
            course(4, "IT104", 1, 2, 3),
        ];
        let enrollments = vec![
            enrollment(10, 1, EnrollmentStatus::Completed),
            enrollment(11, 2, EnrollmentStatus::Completed),
            enrollment(12, 3, EnrollmentStatus::Enrolled),
        ];
        let grades = vec![
            grade(10, [Some(90.0), Some(90.0), Some(90.0)]),
            grade(11, [Some(80.0), Some(85.0), Some(87.0)]),
            grade(12, [Some(75.0), None, None]),
        ];

        let entries = build_entries(courses, &enrollments, &grades);
        assert_eq!(entries[1].average, Some(84.0));
        assert_eq!(entries[3].status, CourseStatus::NotTaken);

        let summary = summarize(&entries);
        assert_eq!(
            summary,
            ProspectusSummary {
                total_courses: 4,
                enrolled: 1,
                completed: 2,
                units_earned: 7,
                general_average: Some(83.0),
            }
        );
    }

    #[test]
    fn test_summary_without_grades() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_courses, 0);
        assert_eq!(summary.general_average, None);
    }
}
