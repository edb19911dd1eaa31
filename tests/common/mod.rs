//! Shared on-disk design-system fixture.

#![allow(dead_code)] // each test binary uses a different subset

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

pub const GLOBALS_CSS: &str = r"@import 'tailwindcss';

@layer base {
  :root {
    --background: 0 0% 100%;
    --foreground: 222.2 84% 4.9%;
    --primary: 217 91% 60%;
    --primary-foreground: 210 40% 98%;
    --border: 214.3 31.8% 91.4%;
    --spacing-sm: 0.5rem;
    --radius: 0.5rem;
    --font-sans: Inter, sans-serif;
    --box-shadow: 0 1px 2px rgb(0 0 0 / 0.05);
  }

  .dark {
    --background: 222.2 84% 4.9%;
    --foreground: 210 40% 98%;
    --primary: 217 91% 65%;
  }
}
";

pub const TAILWIND_CONFIG: &str = r"import type { Config } from 'tailwindcss'

export default {
  darkMode: ['class'],
  theme: {
    extend: {
      colors: {
        border: 'hsl(var(--border))',
        primary: {
          DEFAULT: 'hsl(var(--primary))',
          foreground: 'hsl(var(--primary-foreground))',
        },
        brand: '#0055ff',
      },
      borderRadius: {
        lg: 'var(--radius)',
        md: 'calc(var(--radius) - 2px)',
      },
      spacing: {
        '18': '4.5rem',
      },
    },
  },
} satisfies Config
";

pub const BUTTON_TSX: &str = r"import * as React from 'react'
import { Slot } from '@radix-ui/react-slot'
import { cva, type VariantProps } from 'class-variance-authority'

import { cn } from '../../lib/utils'

/**
 * Displays a button or a component that looks like a button.
 */
const buttonVariants = cva('inline-flex items-center', {
  variants: {
    variant: {
      default: 'bg-primary',
      outline: 'border',
    },
    size: {
      default: 'h-10',
      sm: 'h-9',
    },
  },
})

export interface ButtonProps
  extends React.ButtonHTMLAttributes<HTMLButtonElement>,
    VariantProps<typeof buttonVariants> {
  /** Render as the child element */
  asChild?: boolean
  loading: boolean
}

const Button = React.forwardRef<HTMLButtonElement, ButtonProps>(() => null)
Button.displayName = 'Button'

export { Button, buttonVariants }
";

pub const BUTTON_STORIES: &str = "import type { Meta } from '@storybook/react'\n\
import { Button } from './button'\n\nexport default { component: Button } satisfies Meta<typeof Button>\n";

pub const BUTTON_INDEX: &str = "export * from './button'\n";

pub const CARD_TSX: &str = r"import * as React from 'react'
import { clsx } from 'clsx'

export type CardProps = {
  title: string,
  // Optional footer content
  footer?: React.ReactNode,
}

export function Card(props: CardProps) {
  return null
}
Card.displayName = 'Card'
";

pub const CARD_TYPES: &str = "export type CardSize = 'sm' | 'lg'\n";

pub const INPUT_TSX: &str = "import * as React from 'react'\n\nexport const Input = () => null\n";

/// A design system laid out the way the readers expect.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    /// Button (stories, index), card (types), input, plus an `empty`
    /// directory with no main source.
    pub fn new() -> Self {
        let dir = tempdir().expect("Failed to create temp dir");
        let fixture = Self { dir };

        fixture.write("tailwind.config.ts", TAILWIND_CONFIG);
        fixture.write("src/styles/globals.css", GLOBALS_CSS);
        fixture.write("src/components/button/button.tsx", BUTTON_TSX);
        fixture.write("src/components/button/button.stories.tsx", BUTTON_STORIES);
        fixture.write("src/components/button/index.ts", BUTTON_INDEX);
        fixture.write("src/components/card/card.tsx", CARD_TSX);
        fixture.write("src/components/card/card.types.ts", CARD_TYPES);
        fixture.write("src/components/input/input.tsx", INPUT_TSX);
        fs::create_dir_all(fixture.src().join("components/empty"))
            .expect("Failed to create empty component dir");

        fixture
    }

    /// The design-system source directory.
    pub fn src(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture dir");
        }
        fs::write(&path, content).expect("Failed to write fixture file");
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.dir.path().join(relative)).expect("Failed to remove fixture file");
    }
}
