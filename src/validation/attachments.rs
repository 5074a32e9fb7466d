//! Document-wide attachment rules
//!
//! Runs after the property walk so that every attachmentReference has been
//! recorded. A reference that declares its own extension, content type, or
//! size rule takes over that check for the attachment it names.

use super::context::ValidationContext;
use super::messages;
use crate::schema::{
    attachment_content_type, attachment_length, attachments, file_extension, DocumentDefinition,
};

/// Whether the file name's extension is in `supported` (case-insensitive)
pub fn extension_supported(name: &str, supported: &[String]) -> bool {
    let extension = file_extension(name);
    supported.iter().any(|s| s.eq_ignore_ascii_case(extension))
}

/// Whether the declared content type is in `supported`
pub fn content_type_supported(content_type: Option<&str>, supported: &[String]) -> bool {
    content_type.map_or(false, |ct| supported.iter().any(|s| s == ct))
}

pub fn check_attachments(ctx: &mut ValidationContext<'_>, definition: &DocumentDefinition) {
    let (doc, old_doc) = (ctx.doc(), ctx.old_doc());
    let Some(entries) = attachments(doc) else {
        return;
    };
    if entries.is_empty() {
        return;
    }

    if !definition.allow_attachments.is_set(doc, old_doc) {
        ctx.push(messages::attachments_not_allowed());
        return;
    }

    let Some(constraints) = &definition.attachment_constraints else {
        return;
    };
    let constraints = constraints.resolve(doc, old_doc);

    let mut total_size = 0u64;
    for (name, entry) in entries {
        let size = attachment_length(entry);
        total_size = total_size.saturating_add(size);

        let overrides = ctx.reference(name);
        if constraints.require_attachment_references && overrides.is_none() {
            ctx.push(messages::attachment_reference_required(name));
        }
        let overrides = overrides.unwrap_or_default();

        if let Some(maximum) = constraints.maximum_individual_size {
            if !overrides.maximum_size && size > maximum {
                ctx.push(messages::maximum_individual_attachment_size(name, maximum));
            }
        }
        if let Some(supported) = &constraints.supported_extensions {
            if !overrides.extensions && !extension_supported(name, supported) {
                ctx.push(messages::attachment_extension(name, supported));
            }
        }
        if let Some(supported) = &constraints.supported_content_types {
            if !overrides.content_types
                && !content_type_supported(attachment_content_type(entry), supported)
            {
                ctx.push(messages::attachment_content_type(name, supported));
            }
        }
    }

    if let Some(maximum) = constraints.maximum_total_size {
        if total_size > maximum {
            ctx.push(messages::maximum_total_attachment_size(maximum));
        }
    }
    if let Some(maximum) = constraints.maximum_attachment_count {
        if entries.len() > maximum {
            ctx.push(messages::maximum_attachment_count(maximum));
        }
    }
}
