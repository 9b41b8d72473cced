use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Padding};
use sessionlens_core::Role;

pub struct Theme;

impl Theme {
    // ── Background ───────────────────────────────────────────────────
    pub const BG_SURFACE: Color = Color::Rgb(30, 35, 50);
    pub const BG_SELECTED: Color = Color::Rgb(40, 48, 68);

    // ── Border ───────────────────────────────────────────────────────
    pub const BORDER_DIM: Color = Color::DarkGray;
    pub const BORDER_NORMAL: Color = Color::Rgb(60, 65, 80);
    pub const BORDER_ACCENT: Color = Color::Rgb(100, 180, 240);

    // ── Text hierarchy ───────────────────────────────────────────────
    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_SECONDARY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_MUTED: Color = Color::Rgb(80, 85, 100);
    pub const TEXT_CONTENT: Color = Color::Rgb(170, 175, 190);

    // ── Key style (for footer hints) ─────────────────────────────────
    pub const TEXT_KEY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_KEY_DESC: Color = Color::DarkGray;

    // ── Accent ───────────────────────────────────────────────────────
    pub const ACCENT_BLUE: Color = Color::Rgb(100, 180, 240);
    pub const ACCENT_GREEN: Color = Color::Rgb(80, 200, 120);
    pub const ACCENT_RED: Color = Color::Rgb(220, 80, 80);
    pub const ACCENT_YELLOW: Color = Color::Rgb(220, 180, 60);
    pub const ACCENT_PURPLE: Color = Color::Rgb(180, 140, 220);
    pub const ACCENT_ORANGE: Color = Color::Rgb(217, 119, 80);

    // ── Role colors ──────────────────────────────────────────────────
    pub const ROLE_USER: Color = Color::Rgb(80, 180, 100);
    pub const ROLE_AGENT: Color = Color::Rgb(100, 140, 220);
    pub const ROLE_SYSTEM: Color = Color::Gray;
    pub const ROLE_TOOL: Color = Color::Rgb(180, 140, 80);

    // ── Minimap ──────────────────────────────────────────────────────
    pub const MINIMAP_BG: Color = Color::Rgb(22, 25, 34);
    pub const MINIMAP_INDICATOR: Color = Color::Rgb(220, 180, 60);

    // ── Search ───────────────────────────────────────────────────────
    pub const MARK_FG: Color = Color::Black;
    pub const MARK_BG: Color = Color::Rgb(220, 180, 60);

    // ── Padding ──────────────────────────────────────────────────────
    pub const PADDING_CARD: Padding = Padding::new(2, 2, 1, 1);

    // ── Block helpers ────────────────────────────────────────────────

    pub fn block() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_NORMAL))
    }

    pub fn block_dim() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_DIM))
    }

    pub fn block_accent() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_ACCENT))
    }
}

// ── Role color / badge ────────────────────────────────────────────────

pub fn role_color(role: Role) -> Color {
    match role {
        Role::User => Theme::ROLE_USER,
        Role::Agent => Theme::ROLE_AGENT,
        Role::System => Theme::ROLE_SYSTEM,
        Role::Tool => Theme::ROLE_TOOL,
    }
}

pub fn role_badge(role: Role) -> &'static str {
    match role {
        Role::User => " USER ",
        Role::Agent => " AGENT ",
        Role::System => " SYS ",
        Role::Tool => " TOOL ",
    }
}

// ── Agent icon / color ───────────────────────────────────────────────

pub fn agent_icon(agent: &str) -> &'static str {
    match agent {
        "claude" | "claude-code" => " CC ",
        "codex" => " Cx ",
        "opencode" => " Oc ",
        "cline" => " Cl ",
        "amp" => " Ap ",
        "cursor" => " Cr ",
        _ => " ?? ",
    }
}

pub fn agent_color(agent: &str) -> Color {
    match agent {
        "claude" | "claude-code" => Color::Rgb(217, 119, 80),
        "codex" => Color::Rgb(16, 185, 129),
        "opencode" => Color::Rgb(245, 158, 11),
        "cline" => Color::Rgb(239, 68, 68),
        "amp" => Color::Rgb(168, 85, 247),
        "cursor" => Color::Rgb(80, 180, 220),
        _ => Color::White,
    }
}
