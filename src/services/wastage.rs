use crate::{
    errors::ServiceError,
    models::{batch_return, material_dispatch},
};
use metrics::counter;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Sum of `receivedQuantity` over a dispatch's batches.
pub fn total_received(batches: &[batch_return::Model]) -> f64 {
    batches.iter().map(|batch| batch.received_quantity).sum()
}

/// `((given - received) / given) * 100`, or `None` when `given` cannot be divided by.
///
/// Over-returns are reported as negative wastage.
pub fn wastage_percentage(given_quantity: f64, total_received: f64) -> Option<f64> {
    if !given_quantity.is_finite() || given_quantity <= 0.0 {
        return None;
    }
    let percentage = ((given_quantity - total_received) / given_quantity) * 100.0;
    percentage.is_finite().then_some(percentage)
}

/// Two-decimal text, as persisted in `wastage` and shown in reports.
///
/// Formats the value from [`rounded_percentage`] so text and numeric reports agree
/// on half-cent ties.
pub fn format_percentage(percentage: f64) -> String {
    format!("{:.2}", rounded_percentage(percentage))
}

/// Numeric value rounded to two decimals, ties away from zero.
pub fn rounded_percentage(percentage: f64) -> f64 {
    let rounded = (percentage * 100.0).round() / 100.0;
    // -0.0 would print as "-0.00"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Wastage text for one dispatch, computed from live batch data.
pub fn dispatch_wastage(
    dispatch: &material_dispatch::Model,
    batches: &[batch_return::Model],
) -> Option<String> {
    wastage_percentage(dispatch.given_quantity, total_received(batches)).map(format_percentage)
}

/// Recomputes and persists the `wastage` field of one dispatch.
///
/// A missing dispatch or an unusable `givenQuantity` is not an error: nothing is
/// written and `None` is returned.
#[instrument(skip(conn))]
pub async fn recompute_wastage<C>(
    conn: &C,
    material_id: Uuid,
) -> Result<Option<String>, ServiceError>
where
    C: ConnectionTrait,
{
    let Some(dispatch) = material_dispatch::Entity::find_by_id(material_id)
        .one(conn)
        .await
        .map_err(|e| {
            error!("Failed to load dispatch {} for recompute: {}", material_id, e);
            ServiceError::DatabaseError(e)
        })?
    else {
        debug!("Skipping wastage recompute, dispatch {} not found", material_id);
        counter!("material_wastage.recompute.skipped", 1);
        return Ok(None);
    };

    let batches = batch_return::Entity::find()
        .filter(batch_return::Column::MaterialId.eq(material_id))
        .all(conn)
        .await
        .map_err(|e| {
            error!("Failed to load batch returns for {}: {}", material_id, e);
            ServiceError::DatabaseError(e)
        })?;

    let Some(wastage) = dispatch_wastage(&dispatch, &batches) else {
        info!(
            given_quantity = dispatch.given_quantity,
            "Skipping wastage recompute for dispatch {} with unusable quantity", material_id
        );
        counter!("material_wastage.recompute.skipped", 1);
        return Ok(None);
    };

    let mut active: material_dispatch::ActiveModel = dispatch.into();
    active.wastage = Set(wastage.clone());
    active.update(conn).await.map_err(|e| {
        error!("Failed to persist wastage for {}: {}", material_id, e);
        ServiceError::DatabaseError(e)
    })?;

    counter!("material_wastage.recompute", 1);
    info!(wastage = %wastage, "Recomputed wastage for dispatch {}", material_id);
    Ok(Some(wastage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn batch(quantity: f64) -> batch_return::Model {
        batch_return::Model {
            id: Uuid::new_v4(),
            material_id: Uuid::nil(),
            received_quantity: quantity,
            received_date: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(100.0, 75.0, "25.00")]
    #[case(100.0, 0.0, "100.00")]
    #[case(100.0, 120.0, "-20.00")]
    #[case(3.0, 1.0, "66.67")]
    #[case(50.0, 50.0, "0.00")]
    #[case(200.0, 199.75, "0.13")]
    #[case(200.0, 200.25, "-0.13")]
    fn wastage_is_formatted_to_two_decimals(
        #[case] given: f64,
        #[case] received: f64,
        #[case] expected: &str,
    ) {
        let percentage = wastage_percentage(given, received).unwrap();
        assert_eq!(format_percentage(percentage), expected);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn unusable_given_quantity_has_no_wastage(#[case] given: f64) {
        assert_eq!(wastage_percentage(given, 10.0), None);
    }

    #[test]
    fn total_received_sums_batches() {
        let batches = vec![batch(40.0), batch(35.0)];
        assert_eq!(total_received(&batches), 75.0);
        assert_eq!(total_received(&[]), 0.0);
    }

    #[test]
    fn summary_and_text_round_ties_the_same_way() {
        let percentage = wastage_percentage(200.0, 199.75).unwrap();
        assert_eq!(rounded_percentage(percentage), 0.13);
        assert_eq!(format_percentage(percentage), "0.13");
    }

    #[test]
    fn near_zero_wastage_is_never_negative_zero() {
        assert_eq!(format_percentage(-0.001), "0.00");
        assert!(rounded_percentage(-0.001).is_sign_positive());
    }

    #[test]
    fn rounded_percentage_keeps_two_decimals() {
        assert_eq!(rounded_percentage(66.666_666), 66.67);
        assert_eq!(rounded_percentage(-20.0), -20.0);
    }
}
