//! Demo notes inserted once when the table is empty, so a fresh install
//! opens with something on screen.

use crate::db::Database;
use crate::models::NoteType;

struct DemoNote {
    title: &'static str,
    content: &'static str,
    is_favorite: bool,
    color: &'static str,
    tags: &'static [&'static str],
}

const DEMO_NOTES: &[DemoNote] = &[
    DemoNote {
        title: "Welcome to Dark Notepad",
        content: "This is a beautiful cross-platform notepad application with cloud sync, PDF export, and a stunning dark mode UI.",
        is_favorite: true,
        color: "#121212",
        tags: &["welcome", "info"],
    },
    DemoNote {
        title: "Project Ideas",
        content: "1. Mobile app for task tracking\n2. Portfolio website\n3. E-commerce dashboard\n4. Recipe manager\n5. Budget planner",
        is_favorite: false,
        color: "#121212",
        tags: &["projects", "ideas"],
    },
    DemoNote {
        title: "Meeting Notes",
        content: "Team meeting 04/20:\n- Discussed project timeline\n- Assigned tasks to team members\n- Set next meeting for 04/27\n- Review design mockups",
        is_favorite: false,
        color: "#121212",
        tags: &["work", "meeting"],
    },
    DemoNote {
        title: "Shopping List",
        content: "- Milk\n- Eggs\n- Bread\n- Cheese\n- Apples\n- Coffee\n- Pasta\n- Tomato sauce",
        is_favorite: false,
        color: "#121212",
        tags: &["shopping", "personal"],
    },
    DemoNote {
        title: "Flutter Tips",
        content: "1. Use const constructors when possible\n2. Prefer StatelessWidget over StatefulWidget\n3. Use AnimatedBuilder for complex animations\n4. Leverage Provider for state management\n5. Use MediaQuery for responsive design",
        is_favorite: true,
        color: "#845EF7",
        tags: &["flutter", "coding"],
    },
];

/// Insert the demo notes when the table is empty. Returns how many were
/// inserted (0 when the table already has content).
pub fn seed_if_empty(db: &Database) -> rusqlite::Result<usize> {
    if db.count_notes()? > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for demo in DEMO_NOTES {
        let tags: Vec<String> = demo.tags.iter().map(|t| t.to_string()).collect();
        db.create_note(
            demo.title,
            demo.content,
            demo.is_favorite,
            demo.color,
            &tags,
            NoteType::Text,
            &[],
        )?;
        inserted += 1;
    }

    Ok(inserted)
}
