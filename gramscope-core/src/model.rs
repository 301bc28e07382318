use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request-tracing metadata attached to every top-level record under `#debug`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDebugInfo {
    pub request_id: String,
    pub url: String,
    pub loaded_url: Option<String>,
    pub method: String,
    pub retry_count: u32,
    pub error_messages: Vec<String>,
    pub status_code: Option<u16>,
}

impl RequestDebugInfo {
    pub fn for_url(url: &str) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            url: url.to_string(),
            loaded_url: None,
            method: "GET".to_string(),
            retry_count: 0,
            error_messages: Vec::new(),
            status_code: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub owner_username: String,
    pub text: Option<String>,
}

/// A post as it appears in any list context (profile feed, hashtag, place,
/// sidecar child).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(rename = "type")]
    pub post_type: String,
    pub short_code: Option<String>,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
    pub url: Option<String>,
    pub comments_count: Option<i64>,
    pub latest_comments: Vec<CommentRecord>,
    pub dimensions_height: Option<i64>,
    pub dimensions_width: Option<i64>,
    pub display_url: Option<String>,
    pub images: Vec<String>,
    pub video_url: Option<String>,
    pub id: Option<String>,
    pub first_comment: Option<String>,
    pub alt: Option<String>,
    pub likes_count: Option<i64>,
    pub video_view_count: Option<i64>,
    pub timestamp: Option<String>,
    pub location_name: Option<String>,
    pub location_id: Option<String>,
    pub owner_full_name: Option<String>,
    pub owner_username: Option<String>,
    pub owner_id: Option<String>,
    pub product_type: Option<String>,
    pub is_sponsored: Option<bool>,
    pub video_duration: Option<f64>,
}

/// Output of a single post page: the list-context fields plus page-only detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailRecord {
    #[serde(rename = "#debug")]
    pub debug: RequestDebugInfo,
    #[serde(flatten)]
    pub post: PostRecord,
    pub caption_is_edited: Option<bool>,
    pub has_ranked_comments: Option<bool>,
    pub comments_disabled: Option<bool>,
    pub display_resource_urls: Option<Vec<String>>,
    pub child_posts: Option<Vec<PostRecord>>,
    pub location_slug: Option<String>,
    pub is_advertisement: Option<bool>,
    pub tagged_users: Vec<String>,
    pub liked_by: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgtvVideoRecord {
    #[serde(rename = "type")]
    pub video_type: String,
    pub short_code: Option<String>,
    pub title: Option<String>,
    pub caption: String,
    pub comments_count: Option<i64>,
    pub comments_disabled: Option<bool>,
    pub dimensions_height: Option<i64>,
    pub dimensions_width: Option<i64>,
    pub display_url: Option<String>,
    pub likes_count: Option<i64>,
    pub video_duration: f64,
    pub video_view_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(rename = "#debug")]
    pub debug: RequestDebugInfo,
    pub id: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub external_url: Option<String>,
    pub external_url_shimmed: Option<String>,
    pub followers_count: Option<i64>,
    pub follows_count: Option<i64>,
    pub has_channel: Option<bool>,
    pub highlight_reel_count: Option<i64>,
    pub is_business_account: Option<bool>,
    pub joined_recently: Option<bool>,
    pub business_category_name: Option<String>,
    pub private: Option<bool>,
    pub verified: Option<bool>,
    pub profile_pic_url: Option<String>,
    #[serde(rename = "profilePicUrlHD")]
    pub profile_pic_url_hd: Option<String>,
    pub facebook_page: Option<String>,
    pub igtv_video_count: Option<i64>,
    pub latest_igtv_videos: Vec<IgtvVideoRecord>,
    pub posts_count: Option<i64>,
    pub latest_posts: Vec<PostRecord>,
    pub following: Vec<String>,
    pub followed_by: Vec<String>,
    pub has_public_story: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    #[serde(rename = "#debug")]
    pub debug: RequestDebugInfo,
    pub id: Option<String>,
    pub name: Option<String>,
    pub public: Option<bool>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub alias_on_facebook: Option<String>,
    /// `address<Key>` fields decoded from `address_json`.
    #[serde(flatten)]
    pub address: Map<String, Value>,
    pub profile_pic_url: Option<String>,
    pub posts_count: Option<i64>,
    pub top_posts: Vec<PostRecord>,
    pub latest_posts: Vec<PostRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashtagRecord {
    #[serde(rename = "#debug")]
    pub debug: RequestDebugInfo,
    pub id: Option<String>,
    pub name: Option<String>,
    pub public: Option<bool>,
    pub top_posts_only: Option<bool>,
    pub profile_pic_url: Option<String>,
    pub posts_count: Option<i64>,
    pub top_posts: Vec<PostRecord>,
    pub latest_posts: Vec<PostRecord>,
}

/// One finished record, ready to hand to an output sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputRecord {
    Post(Box<PostDetailRecord>),
    Profile(Box<ProfileRecord>),
    Place(Box<PlaceRecord>),
    Hashtag(Box<HashtagRecord>),
}

impl OutputRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            OutputRecord::Post(_) => "post",
            OutputRecord::Profile(_) => "profile",
            OutputRecord::Place(_) => "place",
            OutputRecord::Hashtag(_) => "hashtag",
        }
    }

    pub fn debug(&self) -> &RequestDebugInfo {
        match self {
            OutputRecord::Post(r) => &r.debug,
            OutputRecord::Profile(r) => &r.debug,
            OutputRecord::Place(r) => &r.debug,
            OutputRecord::Hashtag(r) => &r.debug,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
