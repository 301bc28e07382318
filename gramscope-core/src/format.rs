// Pure mapping from raw page nodes into output records. Nothing here performs
// I/O; enrichment values are resolved by the dispatcher and passed in.

use crate::address::decode_address;
use crate::caption::parse_caption;
use crate::model::{
    CommentRecord, HashtagRecord, IgtvVideoRecord, PlaceRecord, PostDetailRecord, PostRecord,
    ProfileRecord, RequestDebugInfo,
};
use crate::raw::{EdgeCollection, RawNode};
use crate::synonyms::{LogicalField, resolve};
use chrono::{DateTime, SecondsFormat};

pub const POST_URL_BASE: &str = "https://www.instagram.com/p/";

const TYPENAME_PREFIX: &str = "Graph";

/// Connection lists gathered for a profile before formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileEnrichment {
    pub following: Vec<String>,
    pub followed_by: Vec<String>,
}

/// Accounts that liked a post, gathered before formatting the post page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostEnrichment {
    pub liked_by: Vec<String>,
}

fn post_type(node: &RawNode) -> String {
    if let Some(typename) = node
        .get::<String>(&["__typename"])
        .filter(|t| !t.is_empty())
    {
        return typename
            .strip_prefix(TYPENAME_PREFIX)
            .unwrap_or(&typename)
            .to_string();
    }
    if node.get_or(&["is_video"], false) {
        "Video".to_string()
    } else {
        "Image".to_string()
    }
}

fn caption_text(node: &RawNode) -> String {
    node.edges("edge_media_to_caption")
        .and_then(|captions| captions.first())
        .and_then(|caption| caption.get(&["text"]))
        .unwrap_or_default()
}

// Fractional seconds are truncated; a zero timestamp counts as missing.
fn iso_timestamp(node: &RawNode) -> Option<String> {
    let seconds = node.get::<f64>(&["taken_at_timestamp"])?.trunc() as i64;
    if seconds == 0 {
        return None;
    }
    DateTime::from_timestamp(seconds, 0).map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Display URLs of a sidecar's children, dropping children without one.
fn display_resources(resources: &EdgeCollection) -> Vec<String> {
    resources
        .nodes
        .iter()
        .filter_map(|child| child.get::<String>(&["display_url"]))
        .filter(|url| !url.is_empty())
        .collect()
}

// Comments arrive newest-first; output is oldest-first for every page type.
fn latest_comments(comments: Option<&EdgeCollection>) -> Vec<CommentRecord> {
    let Some(comments) = comments else {
        return Vec::new();
    };
    comments
        .nodes
        .iter()
        .rev()
        .map(|comment| CommentRecord {
            owner_username: comment.get_or(&["owner", "username"], String::new()),
            text: comment.get(&["text"]),
        })
        .collect()
}

/// Format one post node from any list context.
pub fn format_post(node: &RawNode) -> PostRecord {
    let comments = resolve(node, LogicalField::Comments);
    let likes = resolve(node, LogicalField::Likes);
    let caption = caption_text(node);
    let extraction = parse_caption(&caption);
    let short_code: Option<String> = node.get(&["shortcode"]);

    PostRecord {
        post_type: post_type(node),
        url: short_code.as_ref().map(|code| format!("{}{}", POST_URL_BASE, code)),
        short_code,
        caption,
        hashtags: extraction.hashtags,
        mentions: extraction.mentions,
        comments_count: comments.as_ref().and_then(|c| c.count),
        latest_comments: latest_comments(comments.as_ref()),
        dimensions_height: node.get(&["dimensions", "height"]),
        dimensions_width: node.get(&["dimensions", "width"]),
        display_url: node.get(&["display_url"]),
        images: node
            .edges("edge_sidecar_to_children")
            .map(|children| display_resources(&children))
            .unwrap_or_default(),
        video_url: node.get(&["video_url"]),
        id: node.get(&["id"]),
        first_comment: comments
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|comment| comment.get(&["text"])),
        alt: node.get(&["accessibility_caption"]),
        likes_count: likes.and_then(|l| l.count),
        video_view_count: node.get(&["video_view_count"]),
        timestamp: iso_timestamp(node),
        location_name: node.get(&["location", "name"]),
        location_id: node.get(&["location", "id"]),
        owner_full_name: node.get(&["owner", "full_name"]),
        owner_username: node.get(&["owner", "username"]),
        owner_id: node.get(&["owner", "id"]),
        product_type: node.get(&["product_type"]),
        is_sponsored: node.get(&["is_ad"]),
        video_duration: node.get(&["video_duration"]),
    }
}

/// Format the `shortcode_media` node of a post page.
pub fn format_post_detail(
    node: &RawNode,
    enrichment: PostEnrichment,
    debug: RequestDebugInfo,
) -> PostDetailRecord {
    let sidecar = node.edges("edge_sidecar_to_children");

    PostDetailRecord {
        debug,
        post: format_post(node),
        caption_is_edited: node.get(&["caption_is_edited"]),
        has_ranked_comments: node.get(&["has_ranked_comments"]),
        comments_disabled: node.get(&["comments_disabled"]),
        display_resource_urls: sidecar.as_ref().map(display_resources),
        child_posts: sidecar
            .as_ref()
            .map(|children| children.nodes.iter().map(format_post).collect()),
        location_slug: node.get(&["location", "slug"]),
        is_advertisement: node.get(&["is_ad"]),
        tagged_users: node
            .edges("edge_media_to_tagged_user")
            .map(|tagged| {
                tagged
                    .nodes
                    .iter()
                    .filter_map(|t| t.get::<String>(&["user", "username"]))
                    .collect()
            })
            .unwrap_or_default(),
        liked_by: enrichment.liked_by,
    }
}

/// Format one `{ node }` edge of a profile's IGTV timeline. A bare node
/// without the wrapper is accepted as well.
pub fn format_igtv_video(edge: &RawNode) -> IgtvVideoRecord {
    let node = edge.path(&["node"]).unwrap_or(*edge);
    format_igtv_node(&node)
}

/// Format an IGTV video node already taken out of its edge.
pub fn format_igtv_node(node: &RawNode) -> IgtvVideoRecord {
    IgtvVideoRecord {
        video_type: "Video".to_string(),
        short_code: node.get(&["shortcode"]),
        title: node.get(&["title"]),
        caption: caption_text(node),
        comments_count: node.get(&["edge_media_to_comment", "count"]),
        comments_disabled: node.get(&["comments_disabled"]),
        dimensions_height: node.get(&["dimensions", "height"]),
        dimensions_width: node.get(&["dimensions", "width"]),
        display_url: node.get(&["display_url"]),
        likes_count: node.get(&["edge_liked_by", "count"]),
        video_duration: node.get_or(&["video_duration"], 0.0),
        video_view_count: node.get(&["video_view_count"]),
    }
}

fn format_posts(node: &RawNode, key: &str) -> Vec<PostRecord> {
    node.edges(key)
        .map(|posts| posts.nodes.iter().map(format_post).collect())
        .unwrap_or_default()
}

/// Format the `graphql.user` node of a profile page.
pub fn format_profile(
    node: &RawNode,
    enrichment: ProfileEnrichment,
    debug: RequestDebugInfo,
) -> ProfileRecord {
    let igtv = node.edges("edge_felix_video_timeline");
    let timeline = node.edges("edge_owner_to_timeline_media");

    ProfileRecord {
        debug,
        id: node.get(&["id"]),
        username: node.get(&["username"]),
        full_name: node.get(&["full_name"]),
        biography: node.get(&["biography"]),
        external_url: node.get(&["external_url"]),
        external_url_shimmed: node.get(&["external_url_linkshimmed"]),
        followers_count: node.get(&["edge_followed_by", "count"]),
        follows_count: node.get(&["edge_follow", "count"]),
        has_channel: node.get(&["has_channel"]),
        highlight_reel_count: node.get(&["highlight_reel_count"]),
        is_business_account: node.get(&["is_business_account"]),
        joined_recently: node.get(&["is_joined_recently"]),
        business_category_name: node.get(&["business_category_name"]),
        private: node.get(&["is_private"]),
        verified: node.get(&["is_verified"]),
        profile_pic_url: node.get(&["profile_pic_url"]),
        profile_pic_url_hd: node.get(&["profile_pic_url_hd"]),
        facebook_page: node.get(&["connected_fb_page"]),
        igtv_video_count: igtv.as_ref().and_then(|v| v.count),
        latest_igtv_videos: igtv
            .map(|videos| videos.nodes.iter().map(format_igtv_node).collect())
            .unwrap_or_default(),
        posts_count: timeline.as_ref().and_then(|t| t.count),
        latest_posts: timeline
            .map(|posts| posts.nodes.iter().map(format_post).collect())
            .unwrap_or_default(),
        following: enrichment.following,
        followed_by: enrichment.followed_by,
        has_public_story: node.get(&["has_public_story"]),
    }
}

/// Format the `graphql.location` node of a location page.
pub fn format_place(node: &RawNode, debug: RequestDebugInfo) -> PlaceRecord {
    let address_json: Option<String> = node.get(&["address_json"]);

    PlaceRecord {
        debug,
        id: node.get(&["id"]),
        name: node.get(&["name"]),
        public: node.get(&["has_public_page"]),
        lat: node.get(&["lat"]),
        lng: node.get(&["lng"]),
        slug: node.get(&["slug"]),
        description: node.get(&["blurb"]),
        website: node.get(&["website"]),
        phone: node.get(&["phone"]),
        alias_on_facebook: node.get(&["primary_alias_on_fb"]),
        address: decode_address(address_json.as_deref()),
        profile_pic_url: node.get(&["profile_pic_url"]),
        posts_count: node.get(&["edge_location_to_media", "count"]),
        top_posts: format_posts(node, "edge_location_to_top_posts"),
        latest_posts: format_posts(node, "edge_location_to_media"),
    }
}

/// Format the `graphql.hashtag` node of a tag page.
pub fn format_hashtag(node: &RawNode, debug: RequestDebugInfo) -> HashtagRecord {
    HashtagRecord {
        debug,
        id: node.get(&["id"]),
        name: node.get(&["name"]),
        public: node.get(&["has_public_page"]),
        top_posts_only: node.get(&["is_top_media_only"]),
        profile_pic_url: node.get(&["profile_pic_url"]),
        posts_count: node.get(&["edge_hashtag_to_media", "count"]),
        top_posts: format_posts(node, "edge_hashtag_to_top_posts"),
        latest_posts: format_posts(node, "edge_hashtag_to_media"),
    }
}
