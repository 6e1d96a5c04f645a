//! Hard-coded content used whenever a section has no settings row or is
//! switched off. Public pages never see a missing section.

use super::content::{
    ClosingContent, GalleryContent, GreetingsContent, LoveStoryContent, MusicContent,
    WeddingGiftContent,
};

pub const DEFAULT_THEME_KEY: &str = "classic";

pub const DEFAULT_GREETING_TITLE: &str = "The Wedding Of";
pub const DEFAULT_GREETING_MESSAGE: &str = "Dengan memohon rahmat dan ridho Tuhan Yang Maha Esa, \
kami bermaksud menyelenggarakan pernikahan kami.";
pub const DEFAULT_GREETING_QUOTE: &str =
    "Two souls with but a single thought, two hearts that beat as one.";
pub const DEFAULT_GREETING_QUOTE_SOURCE: &str = "John Keats";

pub const DEFAULT_LOVE_STORY_TITLE: &str = "Our Love Story";
pub const DEFAULT_LOVE_STORY_OPACITY: f64 = 0.5;

pub const DEFAULT_GALLERY_TITLE: &str = "Our Moments";

pub const DEFAULT_GIFT_TITLE: &str = "Wedding Gift";
pub const DEFAULT_GIFT_DESCRIPTION: &str = "Doa restu Anda merupakan karunia yang sangat berarti \
bagi kami. Jika memberi adalah ungkapan tanda kasih, Anda dapat memberi kado secara cashless.";

pub const DEFAULT_CLOSING_TITLE: &str = "Terima Kasih";
pub const DEFAULT_CLOSING_MESSAGE: &str = "Merupakan suatu kehormatan dan kebahagiaan bagi kami \
apabila Bapak/Ibu/Saudara/i berkenan hadir dan memberikan doa restu.";
pub const DEFAULT_CLOSING_OPACITY: f64 = 0.5;

pub fn greetings(is_enabled: bool) -> GreetingsContent {
    GreetingsContent {
        is_enabled,
        title: DEFAULT_GREETING_TITLE.to_string(),
        message: DEFAULT_GREETING_MESSAGE.to_string(),
        quote: DEFAULT_GREETING_QUOTE.to_string(),
        quote_source: DEFAULT_GREETING_QUOTE_SOURCE.to_string(),
    }
}

pub fn love_story(is_enabled: bool) -> LoveStoryContent {
    LoveStoryContent {
        is_enabled,
        main_title: DEFAULT_LOVE_STORY_TITLE.to_string(),
        background_image_url: None,
        overlay_opacity: DEFAULT_LOVE_STORY_OPACITY,
        blocks: Vec::new(),
    }
}

pub fn gallery(is_enabled: bool) -> GalleryContent {
    GalleryContent {
        is_enabled,
        title: DEFAULT_GALLERY_TITLE.to_string(),
        top_row_images: Vec::new(),
        middle_images: Vec::new(),
        bottom_grid_images: Vec::new(),
    }
}

pub fn wedding_gift(is_enabled: bool) -> WeddingGiftContent {
    WeddingGiftContent {
        is_enabled,
        title: DEFAULT_GIFT_TITLE.to_string(),
        description: DEFAULT_GIFT_DESCRIPTION.to_string(),
        recipient_name: None,
        recipient_address: None,
        bank_accounts: Vec::new(),
    }
}

pub fn closing(is_enabled: bool) -> ClosingContent {
    ClosingContent {
        is_enabled,
        title: DEFAULT_CLOSING_TITLE.to_string(),
        message: DEFAULT_CLOSING_MESSAGE.to_string(),
        background_image_url: None,
        overlay_opacity: DEFAULT_CLOSING_OPACITY,
    }
}

/// Music stays off until a track is configured.
pub fn music() -> MusicContent {
    MusicContent {
        is_enabled: false,
        audio_url: None,
        title: None,
        autoplay: true,
        loop_playback: true,
    }
}
