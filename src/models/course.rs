//! Online course, course order, payment receipt and access models

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    pub video_url: Option<String>,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub level: Option<String>,
    pub lessons: Json<Vec<Lesson>>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a course: lesson titles only, no video links
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub level: Option<String>,
    pub lesson_titles: Vec<String>,
}

impl From<Course> for CourseSummary {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            price_cents: course.price_cents,
            image_url: course.image_url,
            level: course.level,
            lesson_titles: course.lessons.0.into_iter().map(|l| l.title).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub level: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub image_url: Option<String>,
    pub level: Option<String>,
    pub lessons: Option<Vec<Lesson>>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "course_order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CourseOrderStatus {
    Pending,
    Paid,
    Verified,
    Rejected,
}

impl CourseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseOrderStatus::Pending => "pending",
            CourseOrderStatus::Paid => "paid",
            CourseOrderStatus::Verified => "verified",
            CourseOrderStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for CourseOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseOrder {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub course_name: String,
    pub amount_cents: i64,
    pub payment_method: String,
    pub status: CourseOrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseOrderRequest {
    pub course_id: i64,
    pub payment_method: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseOrderFilter {
    pub status: Option<CourseOrderStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "receipt_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Submitted,
    Verified,
    Rejected,
}

impl ReceiptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Submitted => "submitted",
            ReceiptStatus::Verified => "verified",
            ReceiptStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentReceipt {
    pub id: i64,
    pub order_id: i64,
    pub user_id: i64,
    pub file_url: String,
    pub storage_id: Option<String>,
    pub status: ReceiptStatus,
    pub admin_note: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReceiptRequest {
    pub order_id: i64,
    pub user_id: i64,
    pub file_url: String,
    pub storage_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewReceiptRequest {
    pub admin_note: Option<String>,
}

/// Course order together with its receipts, as shown to admins and owners
#[derive(Debug, Clone, Serialize)]
pub struct CourseOrderDetail {
    #[serde(flatten)]
    pub order: CourseOrder,
    pub receipts: Vec<PaymentReceipt>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseAccess {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub order_id: Option<i64>,
    pub granted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_hides_video_links() {
        let course = Course {
            id: 4,
            title: "Buttercream basics".into(),
            description: "Piping and smoothing".into(),
            price_cents: 4900,
            image_url: None,
            level: Some("beginner".into()),
            lessons: Json(vec![Lesson {
                title: "Crumb coat".into(),
                video_url: Some("https://videos.example.com/1".into()),
                duration_minutes: Some(12),
            }]),
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let summary = CourseSummary::from(course);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("videos.example.com"));
        assert_eq!(summary.lesson_titles, vec!["Crumb coat".to_string()]);
    }

    #[test]
    fn test_lessons_default_to_empty() {
        let request: CreateCourseRequest = serde_json::from_value(serde_json::json!({
            "title": "Macarons",
            "description": "French meringue",
            "price_cents": 3900
        }))
        .unwrap();
        assert!(request.lessons.is_empty());
        assert!(!request.is_published);
    }
}
