//! Classification table for S3 client operations.
//!
//! Names follow the snake_case client method names agents already know
//! (`list_buckets`, `get_object`, ...). Anything not listed here is
//! unclassified and never executed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    ReadOnly,
    Mutating,
}

use Classification::{Mutating, ReadOnly};

const OPERATIONS: &[(&str, Classification)] = &[
    // bucket and object listings
    ("list_buckets", ReadOnly),
    ("list_directory_buckets", ReadOnly),
    ("list_objects", ReadOnly),
    ("list_objects_v2", ReadOnly),
    ("list_object_versions", ReadOnly),
    ("list_multipart_uploads", ReadOnly),
    ("list_parts", ReadOnly),
    ("list_bucket_analytics_configurations", ReadOnly),
    ("list_bucket_intelligent_tiering_configurations", ReadOnly),
    ("list_bucket_inventory_configurations", ReadOnly),
    ("list_bucket_metrics_configurations", ReadOnly),
    ("head_bucket", ReadOnly),
    ("head_object", ReadOnly),
    // object reads
    ("get_object", ReadOnly),
    ("get_object_acl", ReadOnly),
    ("get_object_attributes", ReadOnly),
    ("get_object_legal_hold", ReadOnly),
    ("get_object_lock_configuration", ReadOnly),
    ("get_object_retention", ReadOnly),
    ("get_object_tagging", ReadOnly),
    ("get_object_torrent", ReadOnly),
    // bucket configuration reads
    ("get_bucket_accelerate_configuration", ReadOnly),
    ("get_bucket_acl", ReadOnly),
    ("get_bucket_analytics_configuration", ReadOnly),
    ("get_bucket_cors", ReadOnly),
    ("get_bucket_encryption", ReadOnly),
    ("get_bucket_intelligent_tiering_configuration", ReadOnly),
    ("get_bucket_inventory_configuration", ReadOnly),
    ("get_bucket_lifecycle", ReadOnly),
    ("get_bucket_lifecycle_configuration", ReadOnly),
    ("get_bucket_location", ReadOnly),
    ("get_bucket_logging", ReadOnly),
    ("get_bucket_metrics_configuration", ReadOnly),
    ("get_bucket_notification", ReadOnly),
    ("get_bucket_notification_configuration", ReadOnly),
    ("get_bucket_ownership_controls", ReadOnly),
    ("get_bucket_policy", ReadOnly),
    ("get_bucket_policy_status", ReadOnly),
    ("get_bucket_replication", ReadOnly),
    ("get_bucket_request_payment", ReadOnly),
    ("get_bucket_tagging", ReadOnly),
    ("get_bucket_versioning", ReadOnly),
    ("get_bucket_website", ReadOnly),
    ("get_public_access_block", ReadOnly),
    // writes
    ("abort_multipart_upload", Mutating),
    ("complete_multipart_upload", Mutating),
    ("copy_object", Mutating),
    ("create_bucket", Mutating),
    ("create_multipart_upload", Mutating),
    ("create_session", Mutating),
    ("delete_bucket", Mutating),
    ("delete_bucket_analytics_configuration", Mutating),
    ("delete_bucket_cors", Mutating),
    ("delete_bucket_encryption", Mutating),
    ("delete_bucket_intelligent_tiering_configuration", Mutating),
    ("delete_bucket_inventory_configuration", Mutating),
    ("delete_bucket_lifecycle", Mutating),
    ("delete_bucket_metrics_configuration", Mutating),
    ("delete_bucket_ownership_controls", Mutating),
    ("delete_bucket_policy", Mutating),
    ("delete_bucket_replication", Mutating),
    ("delete_bucket_tagging", Mutating),
    ("delete_bucket_website", Mutating),
    ("delete_object", Mutating),
    ("delete_object_tagging", Mutating),
    ("delete_objects", Mutating),
    ("delete_public_access_block", Mutating),
    ("put_bucket_accelerate_configuration", Mutating),
    ("put_bucket_acl", Mutating),
    ("put_bucket_analytics_configuration", Mutating),
    ("put_bucket_cors", Mutating),
    ("put_bucket_encryption", Mutating),
    ("put_bucket_intelligent_tiering_configuration", Mutating),
    ("put_bucket_inventory_configuration", Mutating),
    ("put_bucket_lifecycle_configuration", Mutating),
    ("put_bucket_logging", Mutating),
    ("put_bucket_metrics_configuration", Mutating),
    ("put_bucket_notification_configuration", Mutating),
    ("put_bucket_ownership_controls", Mutating),
    ("put_bucket_policy", Mutating),
    ("put_bucket_replication", Mutating),
    ("put_bucket_request_payment", Mutating),
    ("put_bucket_tagging", Mutating),
    ("put_bucket_versioning", Mutating),
    ("put_bucket_website", Mutating),
    ("put_object", Mutating),
    ("put_object_acl", Mutating),
    ("put_object_legal_hold", Mutating),
    ("put_object_lock_configuration", Mutating),
    ("put_object_retention", Mutating),
    ("put_object_tagging", Mutating),
    ("put_public_access_block", Mutating),
    ("restore_object", Mutating),
    ("upload_part", Mutating),
    ("upload_part_copy", Mutating),
    ("write_get_object_response", Mutating),
    // client-side helpers: local file writes or credential-bearing URLs
    ("copy", Mutating),
    ("download_file", Mutating),
    ("download_fileobj", Mutating),
    ("upload_file", Mutating),
    ("upload_fileobj", Mutating),
    ("generate_presigned_post", Mutating),
    ("generate_presigned_url", Mutating),
];

pub fn classify(operation: &str) -> Option<Classification> {
    OPERATIONS
        .iter()
        .find(|(name, _)| *name == operation)
        .map(|(_, class)| *class)
}

pub fn operations() -> impl Iterator<Item = (&'static str, Classification)> {
    OPERATIONS.iter().copied()
}

pub fn read_only_operations() -> impl Iterator<Item = &'static str> {
    operations()
        .filter(|(_, class)| *class == ReadOnly)
        .map(|(name, _)| name)
}
