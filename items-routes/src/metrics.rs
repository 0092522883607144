const ITEMS_RETRIEVED_METRIC_NAME: &str = "items_retrieved";
const ITEMS_CREATED_METRIC_NAME: &str = "num_items_created";
const ITEMS_REPLACED_METRIC_NAME: &str = "num_items_replaced";
const ITEMS_UPDATED_METRIC_NAME: &str = "num_items_updated";
const ITEMS_DELETED_METRIC_NAME: &str = "num_items_deleted";

const RESOURCE_LABEL: &str = "resource";

#[inline]
pub fn increment_items_retrieved(resource: &'static str) {
    increment_items_retrieved_by(resource, 1);
}

#[inline]
pub fn increment_items_retrieved_by(resource: &'static str, amt: usize) {
    metrics::counter!(ITEMS_RETRIEVED_METRIC_NAME, RESOURCE_LABEL => resource)
        .increment(u64::try_from(amt).unwrap_or(u64::MAX));
}

#[inline]
pub fn increment_items_created(resource: &'static str) {
    metrics::counter!(ITEMS_CREATED_METRIC_NAME, RESOURCE_LABEL => resource).increment(1);
}

#[inline]
pub fn increment_items_replaced(resource: &'static str) {
    metrics::counter!(ITEMS_REPLACED_METRIC_NAME, RESOURCE_LABEL => resource).increment(1);
}

#[inline]
pub fn increment_items_updated(resource: &'static str) {
    metrics::counter!(ITEMS_UPDATED_METRIC_NAME, RESOURCE_LABEL => resource).increment(1);
}

#[inline]
pub fn increment_items_deleted(resource: &'static str) {
    metrics::counter!(ITEMS_DELETED_METRIC_NAME, RESOURCE_LABEL => resource).increment(1);
}
