/// Characters used to draw annotation bars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyphs {
    pub bar_start: char,
    pub bar_end: char,
    /// Left cap of a bar whose annotation began in an earlier row
    pub continues_left: char,
    /// Right cap of a bar whose annotation goes on in a later row
    pub continues_right: char,
    pub bar_fill: char,
}

impl Glyphs {
    pub fn left_cap(&self, continues: bool) -> char {
        if continues {
            self.continues_left
        } else {
            self.bar_start
        }
    }

    pub fn right_cap(&self, continues: bool) -> char {
        if continues {
            self.continues_right
        } else {
            self.bar_end
        }
    }
}

pub fn select(fancy_requested: bool) -> Glyphs {
    if fancy_requested {
        fancy()
    } else {
        ascii()
    }
}

fn ascii() -> Glyphs {
    Glyphs {
        bar_start: '[',
        bar_end: ']',
        continues_left: '<',
        continues_right: '>',
        bar_fill: '=',
    }
}

fn fancy() -> Glyphs {
    Glyphs {
        bar_start: '▕',
        bar_end: '▏',
        continues_left: '◀',
        continues_right: '▶',
        bar_fill: '━',
    }
}
