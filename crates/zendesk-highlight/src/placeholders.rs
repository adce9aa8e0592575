//! Zendesk placeholder name tables
//!
//! One ordered set per [`Family`]. Entries ending in `.` or `_` are prefix
//! entries: they stand for every name that continues with one more segment
//! (custom field keys, ticket field ids). `phf_ordered_set!` rejects a
//! duplicate entry at compile time, so every table is duplicate-free.

use phf::{phf_ordered_set, OrderedSet};

use crate::token::Family;

/// Ticket fields
pub static TICKET: OrderedSet<&'static str> = phf_ordered_set! {
    "ticket.account",
    "ticket.cc_names",
    "ticket.created_at",
    "ticket.created_at_with_timestamp",
    "ticket.description",
    "ticket.due_date",
    "ticket.due_date_with_timestamp",
    "ticket.external_id",
    "ticket.group.name",
    "ticket.id",
    "ticket.in_business_hours",
    "ticket.link",
    "ticket.priority",
    "ticket.score",
    "ticket.status",
    "ticket.tags",
    "ticket.ticket_field_",
    "ticket.ticket_field_option_title_",
    "ticket.ticket_type",
    "ticket.title",
    "ticket.updated_at",
    "ticket.updated_at_with_timestamp",
    "ticket.url",
    "ticket.url_with_protocol",
    "ticket.via",
    "ticket.public_comments",
    "ticket.latest_comment",
    "ticket.latest_public_comment",
    "ticket.comments_formatted",
    "ticket.public_comments_formatted",
    "ticket.latest_comment_formatted",
    "ticket.latest_public_comment_formatted",
    "ticket.assignee",
    "ticket.submitter",
};

/// Fields of the latest (public) comment
pub static COMMENT: OrderedSet<&'static str> = phf_ordered_set! {
    "ticket.latest_comment.author",
    "ticket.latest_comment.created_at",
    "ticket.latest_comment.created_at_with_time",
    "ticket.latest_comment.is_public",
    "ticket.latest_comment.value",
    "ticket.latest_comment.attachments",

    "ticket.latest_public_comment.author",
    "ticket.latest_public_comment.created_at",
    "ticket.latest_public_comment.created_at_with_time",
    "ticket.latest_public_comment.is_public",
    "ticket.latest_public_comment.value",
    "ticket.latest_public_comment.attachments",
};

/// Current user, requester and assignee fields
pub static USER: OrderedSet<&'static str> = phf_ordered_set! {
    "current_user",
    "current_user.name",
    "current_user.first_name",
    "current_user.last_name",
    "current_user.email",
    "current_user.language",
    "current_user.phone",
    "current_user.external_id",
    "current_user.details",
    "current_user.notes",
    "current_user.time_zone",
    "current_user.role",
    "current_user.extended_role",
    "current_user.id",
    "current_user.locale",
    "current_user.signature",
    "current_user.organization",
    "current_user.tags",
    "current_user.custom_fields.",

    "ticket.submitter.name",
    "ticket.submitter.first_name",
    "ticket.submitter.last_name",
    "ticket.submitter.email",
    "ticket.submitter.language",
    "ticket.submitter.phone",
    "ticket.submitter.external_id",
    "ticket.submitter.details",
    "ticket.submitter.notes",
    "ticket.submitter.time_zone",
    "ticket.submitter.role",
    "ticket.submitter.extended_role",
    "ticket.submitter.id",
    "ticket.submitter.locale",
    "ticket.submitter.signature",
    "ticket.submitter.organization",
    "ticket.submitter.tags",
    "ticket.submitter.custom_fields.",

    "ticket.assignee.name",
    "ticket.assignee.first_name",
    "ticket.assignee.last_name",
    "ticket.assignee.email",
    "ticket.assignee.language",
    "ticket.assignee.phone",
    "ticket.assignee.external_id",
    "ticket.assignee.details",
    "ticket.assignee.notes",
    "ticket.assignee.time_zone",
    "ticket.assignee.role",
    "ticket.assignee.extended_role",
    "ticket.assignee.id",
    "ticket.assignee.locale",
    "ticket.assignee.signature",
    "ticket.assignee.organization",
    "ticket.assignee.tags",
    "ticket.assignee.custom_fields.",
};

/// Organization fields
pub static ORGANIZATION: OrderedSet<&'static str> = phf_ordered_set! {
    "current_user.organization.id",
    "current_user.organization.name",
    "current_user.organization.is_shared",
    "current_user.organization.is_shared_comments",
    "current_user.organization.details",
    "current_user.organization.notes",
    "current_user.organization.tags",

    "ticket.submitter.organization.id",
    "ticket.submitter.organization.name",
    "ticket.submitter.organization.is_shared",
    "ticket.submitter.organization.is_shared_comments",
    "ticket.submitter.organization.details",
    "ticket.submitter.organization.notes",
    "ticket.submitter.organization.tags",

    "ticket.assignee.organization.id",
    "ticket.assignee.organization.name",
    "ticket.assignee.organization.is_shared",
    "ticket.assignee.organization.is_shared_comments",
    "ticket.assignee.organization.details",
    "ticket.assignee.organization.notes",
    "ticket.assignee.organization.tags",

    "ticket.organization.id",
    "ticket.organization.name",
    "ticket.organization.is_shared",
    "ticket.organization.is_shared_comments",
    "ticket.organization.details",
    "ticket.organization.notes",
    "ticket.organization.tags",
};

/// Satisfaction survey fields
pub static SATISFACTION: OrderedSet<&'static str> = phf_ordered_set! {
    "satisfaction",
    "satisfaction.rating_section",
    "satisfaction.current_rating",
    "satisfaction.positive_rating_url",
    "satisfaction.negative_rating_url",
    "satisfaction.current_comment",
};

/// Table for a family
pub fn table(family: Family) -> &'static OrderedSet<&'static str> {
    match family {
        Family::Ticket => &TICKET,
        Family::Comment => &COMMENT,
        Family::User => &USER,
        Family::Organization => &ORGANIZATION,
        Family::Satisfaction => &SATISFACTION,
    }
}

/// Every table paired with its family, in family declaration order
pub fn tables() -> impl Iterator<Item = (Family, &'static OrderedSet<&'static str>)> {
    Family::ALL.into_iter().map(|family| (family, table(family)))
}

/// Check if an entry stands for a family of names with a dynamic final segment
#[inline]
pub fn is_prefix_entry(entry: &str) -> bool {
    entry.ends_with('.') || entry.ends_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(TICKET.len(), 34);
        assert_eq!(COMMENT.len(), 12);
        assert_eq!(USER.len(), 55);
        assert_eq!(ORGANIZATION.len(), 28);
        assert_eq!(SATISFACTION.len(), 6);
    }

    #[test]
    fn test_tables_keep_declaration_order() {
        assert_eq!(TICKET.iter().next(), Some(&"ticket.account"));
        assert_eq!(SATISFACTION.iter().last(), Some(&"satisfaction.current_comment"));
        let families: Vec<_> = tables().map(|(family, _)| family).collect();
        assert_eq!(families, Family::ALL.to_vec());
    }

    #[test]
    fn test_tables_are_disjoint() {
        let all: Vec<&str> = tables().flat_map(|(_, t)| t.iter().copied()).collect();
        let mut sorted = all.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), all.len());
    }

    #[test]
    fn test_prefix_entries() {
        assert!(is_prefix_entry("current_user.custom_fields."));
        assert!(is_prefix_entry("ticket.ticket_field_"));
        assert!(!is_prefix_entry("ticket.id"));

        let prefixes: Vec<&str> = tables()
            .flat_map(|(_, t)| t.iter().copied())
            .filter(|entry| is_prefix_entry(entry))
            .collect();
        assert_eq!(
            prefixes,
            vec![
                "ticket.ticket_field_",
                "ticket.ticket_field_option_title_",
                "current_user.custom_fields.",
                "ticket.submitter.custom_fields.",
                "ticket.assignee.custom_fields.",
            ]
        );
    }
}
