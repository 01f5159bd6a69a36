//! Cake and course order services
//!
//! Both services validate input, apply the lifecycle rules from
//! [`crate::services::lifecycle`] and persist through the repositories.

use tracing::info;

use crate::database::CakeOrderRepository;
use crate::database::CourseRepository;
use crate::models::{
    CakeOrder, CakeOrderStatus, Course, CourseAccess, CourseOrder, CourseOrderDetail,
    CourseOrderStatus, CreateCakeOrderRequest, CreateCourseOrderRequest, CreateReceiptRequest,
    DeliveryMethod, PaymentReceipt, StoredFile, UpdateCakeOrderStatusRequest,
};
use crate::services::auth::AuthContext;
use crate::services::availability::AvailabilityService;
use crate::services::lifecycle::{check_cake_transition, check_receipt_review, check_receipt_submission};
use crate::utils::errors::{BakeshopError, Result};
use crate::utils::helpers::{normalize_email, optional_field, require_field, validate_phone};
use crate::utils::logging::{log_admin_action, log_order_transition};

/// Trim and check a cake order submission
pub fn validate_cake_order(request: CreateCakeOrderRequest) -> Result<CreateCakeOrderRequest> {
    let delivery_address = optional_field(request.delivery_address);
    if request.delivery_method == DeliveryMethod::Delivery && delivery_address.is_none() {
        return Err(BakeshopError::InvalidInput(
            "delivery_address is required for delivery orders".to_string(),
        ));
    }

    Ok(CreateCakeOrderRequest {
        customer_name: require_field("customer_name", &request.customer_name)?,
        customer_email: normalize_email(&request.customer_email)?,
        customer_phone: validate_phone(&request.customer_phone)?,
        event_date: request.event_date,
        size: require_field("size", &request.size)?,
        shape: require_field("shape", &request.shape)?,
        flavor: require_field("flavor", &request.flavor)?,
        filling: optional_field(request.filling),
        decoration_notes: optional_field(request.decoration_notes),
        inscription: optional_field(request.inscription),
        reference_image_urls: request
            .reference_image_urls
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect(),
        delivery_method: request.delivery_method,
        delivery_address,
        delivery_time: optional_field(request.delivery_time),
    })
}

#[derive(Clone)]
pub struct CakeOrderService {
    orders: CakeOrderRepository,
    availability: AvailabilityService,
}

impl CakeOrderService {
    pub fn new(orders: CakeOrderRepository, availability: AvailabilityService) -> Self {
        Self { orders, availability }
    }

    /// Place a custom cake order on an available date
    pub async fn create(&self, request: CreateCakeOrderRequest) -> Result<CakeOrder> {
        let request = validate_cake_order(request)?;
        self.availability.ensure_bookable(request.event_date).await?;

        let order = self.orders.create(request).await?;
        info!(order_id = order.id, event_date = %order.event_date, "Cake order placed");
        Ok(order)
    }

    pub async fn get(&self, id: i64) -> Result<CakeOrder> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| BakeshopError::not_found("Cake order", id))
    }

    pub async fn list(&self, status: Option<CakeOrderStatus>) -> Result<Vec<CakeOrder>> {
        self.orders.list(status).await
    }

    /// Apply an admin status change
    pub async fn update_status(
        &self,
        id: i64,
        request: UpdateCakeOrderStatusRequest,
        admin_id: i64,
    ) -> Result<CakeOrder> {
        let current = self.get(id).await?;
        let reason = check_cake_transition(
            current.status,
            request.status,
            request.cancellation_reason.as_deref(),
        )?;

        // Compare-and-set on the status read above
        let updated = self
            .orders
            .update_status(id, current.status, request.status, reason, optional_field(request.admin_notes))
            .await?
            .ok_or_else(|| BakeshopError::InvalidStateTransition {
                from: current.status.to_string(),
                to: request.status.to_string(),
            })?;

        log_order_transition("cake", id, current.status.as_str(), updated.status.as_str(), Some(admin_id));
        Ok(updated)
    }

    pub async fn delete(&self, id: i64, admin_id: i64) -> Result<()> {
        if !self.orders.delete(id).await? {
            return Err(BakeshopError::not_found("Cake order", id));
        }

        log_admin_action(admin_id, "delete_cake_order", Some(&id.to_string()), None);
        Ok(())
    }
}

#[derive(Clone)]
pub struct CourseOrderService {
    courses: CourseRepository,
}

impl CourseOrderService {
    pub fn new(courses: CourseRepository) -> Self {
        Self { courses }
    }

    async fn published_course(&self, course_id: i64) -> Result<Course> {
        self.courses
            .find_by_id(course_id)
            .await?
            .filter(|course| course.is_published)
            .ok_or_else(|| BakeshopError::not_found("Course", course_id))
    }

    /// Open a pending order for a published course
    pub async fn place_order(&self, caller: &AuthContext, request: CreateCourseOrderRequest) -> Result<CourseOrder> {
        let payment_method = require_field("payment_method", &request.payment_method)?;
        let course = self.published_course(request.course_id).await?;

        let order = self.courses.create_order(caller.user_id(), &course, &payment_method).await?;
        info!(order_id = order.id, course_id = course.id, user_id = caller.user_id(), "Course order placed");
        Ok(order)
    }

    pub async fn get_order(&self, id: i64) -> Result<CourseOrder> {
        self.courses
            .find_order(id)
            .await?
            .ok_or_else(|| BakeshopError::not_found("Course order", id))
    }

    async fn with_receipts(&self, orders: Vec<CourseOrder>) -> Result<Vec<CourseOrderDetail>> {
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let receipts = self.courses.list_receipts(order.id).await?;
            details.push(CourseOrderDetail { order, receipts });
        }
        Ok(details)
    }

    /// Caller's own orders with their receipts
    pub async fn list_mine(&self, caller: &AuthContext) -> Result<Vec<CourseOrderDetail>> {
        let orders = self.courses.list_user_orders(caller.user_id()).await?;
        self.with_receipts(orders).await
    }

    /// All orders with their receipts, for the back office
    pub async fn list(&self, status: Option<CourseOrderStatus>) -> Result<Vec<CourseOrderDetail>> {
        let orders = self.courses.list_orders(status).await?;
        self.with_receipts(orders).await
    }

    /// Check that the caller may attach a receipt to the order
    pub async fn order_for_receipt(&self, caller: &AuthContext, order_id: i64) -> Result<CourseOrder> {
        let order = self.get_order(order_id).await?;
        if order.user_id != caller.user_id() {
            return Err(BakeshopError::PermissionDenied(
                "Only the buyer can upload a receipt for this order".to_string(),
            ));
        }

        check_receipt_submission(order.status)?;
        Ok(order)
    }

    /// Record an uploaded receipt; the order moves to `paid`
    pub async fn submit_receipt(
        &self,
        caller: &AuthContext,
        order_id: i64,
        file: StoredFile,
    ) -> Result<(CourseOrder, PaymentReceipt)> {
        let previous = self.order_for_receipt(caller, order_id).await?;

        let (order, receipt) = self
            .courses
            .submit_receipt(CreateReceiptRequest {
                order_id,
                user_id: caller.user_id(),
                file_url: file.url,
                storage_id: Some(file.storage_id),
            })
            .await?;

        log_order_transition("course", order.id, previous.status.as_str(), order.status.as_str(), Some(caller.user_id()));
        Ok((order, receipt))
    }

    async fn receipt_order(&self, receipt_id: i64, to: CourseOrderStatus) -> Result<CourseOrder> {
        let receipt = self
            .courses
            .find_receipt(receipt_id)
            .await?
            .ok_or_else(|| BakeshopError::not_found("Receipt", receipt_id))?;
        let order = self.get_order(receipt.order_id).await?;

        check_receipt_review(receipt.status, order.status, to)?;
        Ok(order)
    }

    /// Accept a receipt and grant course access
    pub async fn verify_receipt(
        &self,
        receipt_id: i64,
        admin_note: Option<String>,
        admin_id: i64,
    ) -> Result<(CourseOrder, PaymentReceipt, CourseAccess)> {
        let previous = self.receipt_order(receipt_id, CourseOrderStatus::Verified).await?;
        let (order, receipt, access) = self
            .courses
            .verify_receipt(receipt_id, optional_field(admin_note))
            .await?;

        log_order_transition("course", order.id, previous.status.as_str(), order.status.as_str(), Some(admin_id));
        info!(user_id = access.user_id, course_id = access.course_id, "Course access granted");
        Ok((order, receipt, access))
    }

    /// Refuse a receipt; the buyer may upload another
    pub async fn reject_receipt(
        &self,
        receipt_id: i64,
        admin_note: Option<String>,
        admin_id: i64,
    ) -> Result<(CourseOrder, PaymentReceipt)> {
        let previous = self.receipt_order(receipt_id, CourseOrderStatus::Rejected).await?;
        let (order, receipt) = self
            .courses
            .reject_receipt(receipt_id, optional_field(admin_note))
            .await?;

        log_order_transition("course", order.id, previous.status.as_str(), order.status.as_str(), Some(admin_id));
        Ok((order, receipt))
    }

    /// Full course content for buyers and admins
    pub async fn course_content(&self, caller: &AuthContext, course_id: i64) -> Result<Course> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| BakeshopError::not_found("Course", course_id))?;

        if caller.is_admin || self.courses.has_access(caller.user_id(), course_id).await? {
            Ok(course)
        } else {
            Err(BakeshopError::PermissionDenied(
                "Purchase this course to view its content".to_string(),
            ))
        }
    }

    pub async fn my_courses(&self, caller: &AuthContext) -> Result<Vec<Course>> {
        self.courses.list_user_courses(caller.user_id()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn request() -> CreateCakeOrderRequest {
        CreateCakeOrderRequest {
            customer_name: "  Ana Baker ".into(),
            customer_email: "Ana@Example.com".into(),
            customer_phone: "+1 555 0100".into(),
            event_date: NaiveDate::from_ymd_opt(2025, 12, 26).unwrap(),
            size: "8 inch".into(),
            shape: "round".into(),
            flavor: "vanilla".into(),
            filling: Some("  ".into()),
            decoration_notes: None,
            inscription: Some("Happy birthday".into()),
            reference_image_urls: vec![" https://cdn.example.com/ref.png ".into(), "".into()],
            delivery_method: DeliveryMethod::Pickup,
            delivery_address: None,
            delivery_time: None,
        }
    }

    #[test]
    fn test_validate_cake_order_normalizes_fields() {
        let validated = validate_cake_order(request()).unwrap();
        assert_eq!(validated.customer_name, "Ana Baker");
        assert_eq!(validated.customer_email, "ana@example.com");
        assert_eq!(validated.filling, None);
        assert_eq!(validated.reference_image_urls, vec!["https://cdn.example.com/ref.png".to_string()]);
    }

    #[test]
    fn test_delivery_requires_address() {
        let mut delivery = request();
        delivery.delivery_method = DeliveryMethod::Delivery;
        assert_matches!(validate_cake_order(delivery.clone()), Err(BakeshopError::InvalidInput(_)));

        delivery.delivery_address = Some("12 Baker Street".into());
        assert!(validate_cake_order(delivery).is_ok());
    }

    #[test]
    fn test_missing_required_fields() {
        let mut missing_flavor = request();
        missing_flavor.flavor = " ".into();
        assert_matches!(validate_cake_order(missing_flavor), Err(BakeshopError::InvalidInput(_)));

        let mut bad_email = request();
        bad_email.customer_email = "not-an-email".into();
        assert_matches!(validate_cake_order(bad_email), Err(BakeshopError::InvalidInput(_)));
    }
}
