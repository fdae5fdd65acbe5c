//! Turns a template occurring on a date into a payload for the remote service

use crate::dates::DateDecoration;
use crate::error::Result;
use crate::event::{RemoteId, RenderedEvent, PUBLISH_STATUS};
use crate::references::{ReferenceKind, ReferenceResolver};
use crate::slug::build_slug;
use crate::template::EventTemplate;
use crate::traits::RemoteSource;

/// The title of an occurrence, e.g. `Morning Service [Sunday 1st February 2026]`
pub fn format_title(template: &EventTemplate, decoration: &DateDecoration) -> String {
    if template.date_in_title {
        format!("{} [{}]", template.title, decoration.human())
    } else {
        template.title.clone()
    }
}

/// Render `template` on the decorated date.
///
/// Every venue, organiser, tag and category name is resolved into a remote id.
/// Any name that cannot be resolved fails the whole render: no partially tagged event is ever produced.
pub async fn render(
    template: &EventTemplate,
    decoration: &DateDecoration,
    references: &mut ReferenceResolver,
    remote: &dyn RemoteSource,
) -> Result<RenderedEvent> {
    let venue = references.resolve_venue(remote, template.venue.as_deref()).await?;
    let organiser = references.resolve_organiser(remote, template.organiser.as_deref()).await?;
    let tags = resolve_all(references, remote, ReferenceKind::Tag, &template.tags).await?;
    let categories = resolve_all(references, remote, ReferenceKind::Category, &template.categories).await?;

    let date = decoration.iso();
    Ok(RenderedEvent {
        title: format_title(template, decoration),
        // The undated title: the date is already part of the slug
        slug: build_slug(decoration, &template.title),
        description: template.description.clone(),
        excerpt: template.excerpt.clone(),
        start_date: format!("{} {}", date, template.start_time),
        end_date: format!("{} {}", date, template.end_time),
        venue,
        organiser,
        tags,
        categories,
        status: PUBLISH_STATUS.to_string(),
        show_map: true,
        show_map_link: true,
        image: template.image,
    })
}

async fn resolve_all(
    references: &mut ReferenceResolver,
    remote: &dyn RemoteSource,
    kind: ReferenceKind,
    names: &[String],
) -> Result<Vec<RemoteId>> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        ids.push(references.resolve(remote, kind, name).await?);
    }
    Ok(ids)
}
